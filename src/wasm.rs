//! WebAssembly exports for VectorStag.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! Grids cross the boundary as flat row-major `f64` arrays
//! (length = width * height). Polygon sets come back flattened as
//! `[num_rings, id_1, num_points_1, x, y, ..., id_2, num_points_2, ...]`.

use wasm_bindgen::prelude::*;

use crate::error::VectorizeError;
use crate::grid::{AffineTransform, IdentityTransform, RasterGrid, Resolution};
use crate::vectorize::{distinct_values, extract_polygons};

fn to_js_err(err: VectorizeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Trace the regions of `target` in pixel space.
///
/// # Arguments
/// * `data` - Flat row-major samples (length = width * height)
/// * `width` / `height` - Grid size in cells
/// * `target` - Value whose regions are outlined
/// * `x_res` / `y_res` - World-space cell size
/// * `nodata` - Optional NODATA value (NaN is always NODATA)
/// * `simplify` - Optional Douglas-Peucker tolerance applied to each ring
///
/// # Returns
/// Flat polygon array, see module docs.
#[wasm_bindgen]
pub fn extract_polygons_wasm(
    data: &[f64],
    width: usize,
    height: usize,
    target: f64,
    x_res: f64,
    y_res: f64,
    nodata: Option<f64>,
    simplify: Option<f64>,
) -> Result<Vec<f64>, JsValue> {
    let grid = RasterGrid::from_vec(data.to_vec(), width, height, nodata).map_err(to_js_err)?;
    let resolution = Resolution::new(x_res, y_res).map_err(to_js_err)?;
    let polygons =
        extract_polygons(&grid, resolution, target, &IdentityTransform).map_err(to_js_err)?;
    Ok(match simplify {
        Some(epsilon) => polygons.simplify(epsilon).to_flat(),
        None => polygons.to_flat(),
    })
}

/// Trace the regions of `target` through a 6-coefficient geotransform.
///
/// Resolution is taken from the transform's pixel width and height.
#[wasm_bindgen]
pub fn extract_polygons_georeferenced_wasm(
    data: &[f64],
    width: usize,
    height: usize,
    target: f64,
    geotransform: &[f64],
    nodata: Option<f64>,
) -> Result<Vec<f64>, JsValue> {
    let gt: [f64; 6] = geotransform.try_into().map_err(|_| {
        JsValue::from_str(&format!(
            "geotransform needs 6 coefficients, got {}",
            geotransform.len()
        ))
    })?;
    let grid = RasterGrid::from_vec(data.to_vec(), width, height, nodata).map_err(to_js_err)?;
    let transform = AffineTransform::from_geotransform(gt).map_err(to_js_err)?;
    let resolution = Resolution::new(gt[1].abs(), gt[5].abs()).map_err(to_js_err)?;
    let polygons = extract_polygons(&grid, resolution, target, &transform).map_err(to_js_err)?;
    Ok(polygons.to_flat())
}

/// Distinct non-NODATA values, ascending.
#[wasm_bindgen]
pub fn distinct_values_wasm(
    data: &[f64],
    width: usize,
    height: usize,
    nodata: Option<f64>,
) -> Result<Vec<f64>, JsValue> {
    let grid = RasterGrid::from_vec(data.to_vec(), width, height, nodata).map_err(to_js_err)?;
    Ok(distinct_values(&grid))
}
