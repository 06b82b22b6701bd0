//! Read-only grid samplers.
//!
//! A sampler answers one question: what is stored at `(x, y)`, or is there
//! nothing there. `None` is the NODATA sentinel.

use ndarray::{Array2, ArrayView2};

use crate::error::{Result, VectorizeError};

/// Read-only access to a `width x height` grid of samples.
pub trait GridSampler {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Sample at `(x, y)`, or `None` for NODATA.
    ///
    /// Only called with `x < width()` and `y < height()`.
    fn sample(&self, x: usize, y: usize) -> Option<f64>;

    /// Total number of cells.
    fn cell_count(&self) -> usize {
        self.width() * self.height()
    }
}

impl<S: GridSampler + ?Sized> GridSampler for &S {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn sample(&self, x: usize, y: usize) -> Option<f64> {
        (**self).sample(x, y)
    }
}

/// Grid backed by an `ndarray` array of shape `(height, width)`.
///
/// Cells equal to the NODATA value, and NaN cells, read as `None`.
#[derive(Clone, Debug)]
pub struct RasterGrid {
    data: Array2<f64>,
    nodata: Option<f64>,
}

impl RasterGrid {
    /// Wrap an array. `nodata` marks cells that carry no sample.
    pub fn new(data: Array2<f64>, nodata: Option<f64>) -> Self {
        Self { data, nodata }
    }

    /// Build from row-major samples, `width * height` long.
    pub fn from_vec(
        data: Vec<f64>,
        width: usize,
        height: usize,
        nodata: Option<f64>,
    ) -> Result<Self> {
        let expected = width * height;
        let actual = data.len();
        let data = Array2::from_shape_vec((height, width), data)
            .map_err(|_| VectorizeError::ShapeMismatch { expected, actual })?;
        Ok(Self::new(data, nodata))
    }

    /// Build from a borrowed view, copying the samples.
    pub fn from_view(view: ArrayView2<f64>, nodata: Option<f64>) -> Self {
        Self::new(view.to_owned(), nodata)
    }

    /// A grid of the given size where every cell is NODATA.
    pub fn empty(width: usize, height: usize) -> Self {
        Self::new(Array2::from_elem((height, width), f64::NAN), None)
    }

    /// Set one cell; `None` stores NODATA. Indices outside the grid are
    /// ignored and reported as `false`.
    pub fn set(&mut self, x: usize, y: usize, value: Option<f64>) -> bool {
        let stored = value.unwrap_or_else(|| self.nodata.unwrap_or(f64::NAN));
        match self.data.get_mut([y, x]) {
            Some(cell) => {
                *cell = stored;
                true
            }
            None => false,
        }
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    fn is_nodata(&self, value: f64) -> bool {
        value.is_nan() || self.nodata == Some(value)
    }
}

impl GridSampler for RasterGrid {
    fn width(&self) -> usize {
        self.data.ncols()
    }

    fn height(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    fn sample(&self, x: usize, y: usize) -> Option<f64> {
        let value = self.data[[y, x]];
        if self.is_nodata(value) {
            None
        } else {
            Some(value)
        }
    }
}

/// Grid whose samples come from a closure.
pub struct FnGrid<F> {
    width: usize,
    height: usize,
    sample: F,
}

impl<F> FnGrid<F>
where
    F: Fn(usize, usize) -> Option<f64>,
{
    pub fn new(width: usize, height: usize, sample: F) -> Self {
        Self {
            width,
            height,
            sample,
        }
    }
}

impl<F> GridSampler for FnGrid<F>
where
    F: Fn(usize, usize) -> Option<f64>,
{
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn sample(&self, x: usize, y: usize) -> Option<f64> {
        (self.sample)(x, y)
    }
}
