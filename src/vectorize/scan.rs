//! Full-grid scan collecting one ring per traced boundary.

use tracing::debug;

use crate::error::{Result, VectorizeError};
use crate::grid::{GridSampler, GridToWorld, Resolution};

use super::ring::Ring;
use super::tracer::BoundaryTracer;
use super::visited::VisitedTracker;

/// One traced boundary with its sequential identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub id: usize,
    /// Grid position the trace started from.
    pub start: (usize, usize),
    pub ring: Ring,
}

/// Ordered polygons produced by one scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolygonSet {
    polygons: Vec<Polygon>,
}

impl PolygonSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a ring, assigning the next id.
    pub(crate) fn push(&mut self, start: (usize, usize), ring: Ring) -> usize {
        let id = self.polygons.len();
        self.polygons.push(Polygon { id, start, ring });
        id
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Polygon> {
        self.polygons.get(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.polygons.iter()
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().map(|p| &p.ring)
    }

    pub fn total_area(&self) -> f64 {
        self.rings().map(Ring::area).sum()
    }

    /// Simplify every ring with tolerance `epsilon`, keeping ids and starts.
    ///
    /// Traced rings carry one vertex per cell edge; `epsilon = 0` merges the
    /// vertices along straight runs.
    pub fn simplify(&self, epsilon: f64) -> PolygonSet {
        let polygons = self
            .polygons
            .iter()
            .map(|p| Polygon {
                id: p.id,
                start: p.start,
                ring: p.ring.simplify(epsilon),
            })
            .collect();
        PolygonSet { polygons }
    }

    /// Flatten for FFI.
    ///
    /// Format: `[num_rings, id_1, num_points_1, x, y, x, y, ..., id_2, num_points_2, ...]`
    pub fn to_flat(&self) -> Vec<f64> {
        let mut result = Vec::new();
        result.push(self.polygons.len() as f64);

        for polygon in &self.polygons {
            result.push(polygon.id as f64);
            result.push(polygon.ring.len() as f64);
            for point in polygon.ring.points() {
                result.push(point.x);
                result.push(point.y);
            }
        }

        result
    }
}

impl IntoIterator for PolygonSet {
    type Item = Polygon;
    type IntoIter = std::vec::IntoIter<Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.into_iter()
    }
}

impl<'a> IntoIterator for &'a PolygonSet {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}

/// Trace every region of `target` in `grid`.
///
/// Cells are scanned column by column (outer loop over x, inner over y).
/// The order is part of the result: visitation marks left by one trace
/// decide which later cells may start another.
///
/// # Arguments
/// * `grid` - Sampled grid; NODATA cells never match
/// * `resolution` - World-space cell size
/// * `target` - Value whose regions are outlined
/// * `transform` - Grid index to world coordinate mapping
///
/// # Returns
/// The rings in discovery order, ids counting from 0. Any error aborts the
/// scan and discards rings found so far.
pub fn extract_polygons<G, T>(
    grid: &G,
    resolution: Resolution,
    target: f64,
    transform: &T,
) -> Result<PolygonSet>
where
    G: GridSampler + ?Sized,
    T: GridToWorld + ?Sized,
{
    let mut tracker = VisitedTracker::new(grid.width(), grid.height());
    extract_polygons_with_tracker(grid, resolution, target, transform, &mut tracker)
}

/// [`extract_polygons`] with a caller-supplied tracker.
///
/// Cells already marked in `tracker` are never used as starts. After the
/// call it holds every cell the scan read. The tracker must have the grid's
/// dimensions, otherwise [`VectorizeError::TrackerMismatch`] is returned
/// before any cell is read.
pub fn extract_polygons_with_tracker<G, T>(
    grid: &G,
    resolution: Resolution,
    target: f64,
    transform: &T,
    tracker: &mut VisitedTracker,
) -> Result<PolygonSet>
where
    G: GridSampler + ?Sized,
    T: GridToWorld + ?Sized,
{
    let (width, height) = (grid.width(), grid.height());
    if (tracker.width(), tracker.height()) != (width, height) {
        return Err(VectorizeError::TrackerMismatch {
            expected: (width, height),
            actual: (tracker.width(), tracker.height()),
        });
    }

    debug!(
        width,
        height,
        target,
        x_res = resolution.x,
        y_res = resolution.y,
        "scanning grid"
    );

    let mut polygons = PolygonSet::new();
    let mut tracer = BoundaryTracer::new(grid, transform, resolution, target, tracker);

    for x in 0..width {
        for y in 0..height {
            let is_start = matches!(grid.sample(x, y), Some(v) if v == target);
            if !is_start || tracer.tracker().is_visited(x, y) {
                continue;
            }

            let mut start = (x, y);
            let mut ring = tracer.trace_candidate(x, y)?;

            // The window at (x, y) has the start cell in its upper-left
            // corner. When that window is interior or empty, try the one
            // that has it in the lower-right corner.
            if ring.is_none() && x > 0 && y > 0 {
                start = (x - 1, y - 1);
                ring = tracer.trace_candidate(x - 1, y - 1)?;
            }

            if let Some(ring) = ring {
                let id = polygons.push(start, ring);
                debug!(id, x = start.0, y = start.1, "collected ring");
            }
        }
    }

    debug!(
        rings = polygons.len(),
        visited = tracer.tracker().visited_count(),
        "scan complete"
    );
    Ok(polygons)
}
