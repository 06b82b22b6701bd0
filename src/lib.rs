//! VectorStag Rust Extensions
//!
//! Raster-to-vector conversion by marching-squares boundary tracing, with
//! Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Grid Model
//! A grid is any [`GridSampler`]: `width x height` cells, each holding an
//! `f64` sample or NODATA. [`RasterGrid`] wraps an `ndarray::Array2<f64>` of
//! shape `(height, width)`.
//!
//! ## Output
//! [`extract_polygons`] sweeps the grid once and returns a [`PolygonSet`]:
//! one closed [`Ring`] of world coordinates per traced boundary of the
//! target value, numbered in discovery order. Rings have no holes and
//! same-valued regions are not merged.
//!
//! ## Georeferencing
//! World coordinates come from a caller-supplied [`GridToWorld`] transform
//! plus a half-cell offset. Use [`AffineTransform::cell_centers`] for a
//! north-up raster to get rings that follow cell edges exactly.

pub mod error;
pub mod grid;
pub mod vectorize;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Result, VectorizeError};
pub use grid::{
    AffineTransform, FnGrid, GridSampler, GridToWorld, IdentityTransform, RasterGrid, Resolution,
};
pub use vectorize::{
    distinct_values, extract_all_polygons, extract_polygons, extract_polygons_by_value,
    extract_polygons_with_tracker, BoundaryTracer, Polygon, PolygonSet, Ring, ValuePolygons,
    VisitedTracker, WorldPoint,
};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::PyReadonlyArray2;
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::VectorizeError;
    use crate::grid::{AffineTransform, IdentityTransform, RasterGrid, Resolution};
    use crate::vectorize::{self, PolygonSet};

    /// `(id, [(x, y), ...])`
    type PyPolygon = (usize, Vec<(f64, f64)>);

    fn to_py_err(err: VectorizeError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn polygons_to_py(polygons: PolygonSet) -> Vec<PyPolygon> {
        polygons
            .into_iter()
            .map(|p| {
                let coords = p.ring.into_points().into_iter().map(Into::into).collect();
                (p.id, coords)
            })
            .collect()
    }

    // ========================================================================
    // Polygon extraction
    // ========================================================================

    /// Trace the regions of `target` in a 2D float grid.
    ///
    /// # Arguments
    /// * `grid` - 2D array of shape (height, width)
    /// * `target` - Value whose regions are outlined
    /// * `x_res` / `y_res` - World-space cell size
    /// * `geotransform` - Optional 6-coefficient affine transform; identity if omitted
    /// * `nodata` - Optional NODATA value (NaN is always NODATA)
    /// * `simplify` - Optional Douglas-Peucker tolerance applied to each ring
    ///
    /// # Returns
    /// List of `(id, [(x, y), ...])` closed rings in discovery order.
    #[pyfunction]
    #[pyo3(signature = (grid, target, x_res=1.0, y_res=1.0, geotransform=None, nodata=None, simplify=None))]
    pub fn extract_polygons(
        grid: PyReadonlyArray2<'_, f64>,
        target: f64,
        x_res: f64,
        y_res: f64,
        geotransform: Option<[f64; 6]>,
        nodata: Option<f64>,
        simplify: Option<f64>,
    ) -> PyResult<Vec<PyPolygon>> {
        let raster = RasterGrid::from_view(grid.as_array(), nodata);
        let resolution = Resolution::new(x_res, y_res).map_err(to_py_err)?;

        let polygons = match geotransform {
            Some(gt) => {
                let transform = AffineTransform::from_geotransform(gt).map_err(to_py_err)?;
                vectorize::extract_polygons(&raster, resolution, target, &transform)
            }
            None => vectorize::extract_polygons(&raster, resolution, target, &IdentityTransform),
        }
        .map_err(to_py_err)?;

        Ok(match simplify {
            Some(epsilon) => polygons_to_py(polygons.simplify(epsilon)),
            None => polygons_to_py(polygons),
        })
    }

    /// Distinct non-NODATA values of a 2D float grid, ascending.
    #[pyfunction]
    #[pyo3(signature = (grid, nodata=None))]
    pub fn distinct_values(grid: PyReadonlyArray2<'_, f64>, nodata: Option<f64>) -> Vec<f64> {
        let raster = RasterGrid::from_view(grid.as_array(), nodata);
        vectorize::distinct_values(&raster)
    }

    /// VectorStag Rust extension module
    #[pymodule]
    pub fn vectorstag(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(extract_polygons, m)?)?;
        m.add_function(wrap_pyfunction!(distinct_values, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::vectorstag;
