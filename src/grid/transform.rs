//! Grid-to-world transforms.
//!
//! Deriving a transform from georeferencing metadata belongs to the caller;
//! this module only evaluates one.

use crate::error::{Result, VectorizeError};

/// Maps a grid index to a world coordinate.
pub trait GridToWorld {
    fn grid_to_world(&self, gx: usize, gy: usize) -> Result<(f64, f64)>;
}

impl<F> GridToWorld for F
where
    F: Fn(usize, usize) -> Result<(f64, f64)>,
{
    fn grid_to_world(&self, gx: usize, gy: usize) -> Result<(f64, f64)> {
        self(gx, gy)
    }
}

/// Grid indices are world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IdentityTransform;

impl GridToWorld for IdentityTransform {
    fn grid_to_world(&self, gx: usize, gy: usize) -> Result<(f64, f64)> {
        Ok((gx as f64, gy as f64))
    }
}

/// Six-coefficient affine transform in geotransform order:
///
/// ```text
/// world_x = origin_x + gx * pixel_width + gy * row_rotation
/// world_y = origin_y + gx * column_rotation + gy * pixel_height
/// ```
///
/// `pixel_height` is negative for north-up rasters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub column_rotation: f64,
    pub pixel_height: f64,
}

impl AffineTransform {
    /// Build from `[origin_x, pixel_width, row_rotation, origin_y, column_rotation, pixel_height]`.
    pub fn from_geotransform(gt: [f64; 6]) -> Result<Self> {
        if gt.iter().any(|c| !c.is_finite()) {
            return Err(VectorizeError::InvalidTransform(format!(
                "non-finite coefficient in {gt:?}"
            )));
        }
        let transform = Self {
            origin_x: gt[0],
            pixel_width: gt[1],
            row_rotation: gt[2],
            origin_y: gt[3],
            column_rotation: gt[4],
            pixel_height: gt[5],
        };
        if transform.determinant() == 0.0 {
            return Err(VectorizeError::InvalidTransform(format!(
                "singular geotransform {gt:?}"
            )));
        }
        Ok(transform)
    }

    /// North-up transform mapping an index to the upper-left corner of its
    /// cell; cell `(0, 0)` starts at `(west, north)`.
    pub fn from_origin(west: f64, north: f64, x_res: f64, y_res: f64) -> Result<Self> {
        Self::from_geotransform([west, x_res, 0.0, north, 0.0, -y_res])
    }

    /// North-up transform mapping an index to the centre of its cell.
    ///
    /// With this convention the half-cell offset applied by the tracer puts
    /// ring vertices exactly on cell corners.
    pub fn cell_centers(west: f64, north: f64, x_res: f64, y_res: f64) -> Result<Self> {
        Self::from_geotransform([
            west + x_res / 2.0,
            x_res,
            0.0,
            north - y_res / 2.0,
            0.0,
            -y_res,
        ])
    }

    pub fn to_geotransform(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.column_rotation,
            self.pixel_height,
        ]
    }

    fn determinant(&self) -> f64 {
        self.pixel_width * self.pixel_height - self.row_rotation * self.column_rotation
    }
}

impl GridToWorld for AffineTransform {
    #[inline]
    fn grid_to_world(&self, gx: usize, gy: usize) -> Result<(f64, f64)> {
        let gx = gx as f64;
        let gy = gy as f64;
        Ok((
            self.origin_x + gx * self.pixel_width + gy * self.row_rotation,
            self.origin_y + gx * self.column_rotation + gy * self.pixel_height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity() {
        assert_eq!(IdentityTransform.grid_to_world(3, 7).unwrap(), (3.0, 7.0));
    }

    #[test]
    fn test_north_up_affine() {
        let t = AffineTransform::from_origin(1000.0, 5000.0, 10.0, 20.0).unwrap();
        let (x, y) = t.grid_to_world(2, 3).unwrap();
        assert_relative_eq!(x, 1020.0);
        assert_relative_eq!(y, 4940.0);
        assert_eq!(t.to_geotransform(), [1000.0, 10.0, 0.0, 5000.0, 0.0, -20.0]);
    }

    #[test]
    fn test_cell_centers() {
        let t = AffineTransform::cell_centers(100.0, 200.0, 2.0, 4.0).unwrap();
        let (x, y) = t.grid_to_world(0, 0).unwrap();
        assert_relative_eq!(x, 101.0);
        assert_relative_eq!(y, 198.0);
        let (x, y) = t.grid_to_world(3, 1).unwrap();
        assert_relative_eq!(x, 107.0);
        assert_relative_eq!(y, 194.0);
    }

    #[test]
    fn test_rotated_affine() {
        let t = AffineTransform::from_geotransform([0.0, 1.0, 0.5, 0.0, 0.25, -1.0]).unwrap();
        let (x, y) = t.grid_to_world(4, 2).unwrap();
        assert_relative_eq!(x, 5.0);
        assert_relative_eq!(y, -1.0);
    }

    #[test]
    fn test_rejects_degenerate() {
        assert!(matches!(
            AffineTransform::from_geotransform([0.0, 0.0, 0.0, 0.0, 0.0, -1.0]),
            Err(VectorizeError::InvalidTransform(_))
        ));
        assert!(AffineTransform::from_geotransform([f64::NAN, 1.0, 0.0, 0.0, 0.0, -1.0]).is_err());
    }

    #[test]
    fn test_closure_transform() {
        let shift = |gx: usize, gy: usize| -> Result<(f64, f64)> {
            Ok((gx as f64 + 100.0, gy as f64 * -1.0))
        };
        assert_eq!(shift.grid_to_world(1, 2).unwrap(), (101.0, -2.0));

        let failing = |_: usize, _: usize| -> Result<(f64, f64)> {
            Err(VectorizeError::Transform("no crs".into()))
        };
        assert!(failing.grid_to_world(0, 0).is_err());
    }
}
