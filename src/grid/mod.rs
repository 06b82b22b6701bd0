//! Grid access and georeferencing collaborators.
//!
//! The tracing core never touches a concrete raster type. It reads samples
//! through [`GridSampler`] and maps indices to world space through
//! [`GridToWorld`]:
//! - **Samplers**: [`RasterGrid`] over an `ndarray` array, [`FnGrid`] over a closure
//! - **Transforms**: [`AffineTransform`], [`IdentityTransform`], or any closure
//! - **Resolution**: validated world-space cell size

pub mod sampler;
pub mod transform;

pub use sampler::{FnGrid, GridSampler, RasterGrid};
pub use transform::{AffineTransform, GridToWorld, IdentityTransform};

use crate::error::{Result, VectorizeError};

/// World-space size of one cell along each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub x: f64,
    pub y: f64,
}

impl Resolution {
    /// Create a resolution, rejecting non-finite or non-positive sizes.
    pub fn new(x: f64, y: f64) -> Result<Self> {
        if !(x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0) {
            return Err(VectorizeError::InvalidResolution { x, y });
        }
        Ok(Self { x, y })
    }

    /// Unit cells, the usual choice for pixel-space output.
    pub fn unit() -> Self {
        Self { x: 1.0, y: 1.0 }
    }

    pub fn half_x(&self) -> f64 {
        self.x / 2.0
    }

    pub fn half_y(&self) -> f64 {
        self.y / 2.0
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::unit()
    }
}
