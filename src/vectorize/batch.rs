//! Polygon extraction for several target values at once.
//!
//! Each value gets its own scan and its own visited tracker, so scans share
//! nothing mutable and run in parallel with rayon.

use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::grid::{GridSampler, GridToWorld, Resolution};

use super::scan::{extract_polygons, PolygonSet};

/// Polygons traced for one target value.
#[derive(Clone, Debug, PartialEq)]
pub struct ValuePolygons {
    pub value: f64,
    pub polygons: PolygonSet,
}

/// Distinct sample values in ascending order, NODATA excluded.
pub fn distinct_values<G: GridSampler + ?Sized>(grid: &G) -> Vec<f64> {
    let (width, height) = (grid.width(), grid.height());
    let mut values: Vec<f64> = (0..width)
        .flat_map(|x| (0..height).filter_map(move |y| grid.sample(x, y)))
        .filter(|v| !v.is_nan())
        .collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

/// Run one independent scan per value in `values`.
///
/// # Returns
/// Results in the order of `values`. The first failing scan fails the call.
pub fn extract_all_polygons<G, T>(
    grid: &G,
    resolution: Resolution,
    values: &[f64],
    transform: &T,
) -> Result<Vec<ValuePolygons>>
where
    G: GridSampler + Sync + ?Sized,
    T: GridToWorld + Sync + ?Sized,
{
    debug!(values = values.len(), "extracting polygons for multiple values");
    values
        .par_iter()
        .map(|&value| {
            extract_polygons(grid, resolution, value, transform)
                .map(|polygons| ValuePolygons { value, polygons })
        })
        .collect()
}

/// Trace every distinct value present in the grid.
pub fn extract_polygons_by_value<G, T>(
    grid: &G,
    resolution: Resolution,
    transform: &T,
) -> Result<Vec<ValuePolygons>>
where
    G: GridSampler + Sync + ?Sized,
    T: GridToWorld + Sync + ?Sized,
{
    let values = distinct_values(grid);
    extract_all_polygons(grid, resolution, &values, transform)
}
