//! Boundary tracing state machine.
//!
//! From a start position the tracer repeatedly evaluates the neighbor code,
//! picks a move from a fixed table and steps, until it lands on the start
//! position again:
//!
//! | Code        | Move                                   |
//! |-------------|----------------------------------------|
//! | 1, 5, 13    | north                                  |
//! | 2, 3, 7     | east                                   |
//! | 4, 12, 14   | west                                   |
//! | 8, 10, 11   | south                                  |
//! | 6 (saddle)  | east after a north move, else west     |
//! | 9 (saddle)  | north after an east move, else south   |
//!
//! A saddle 6 window can only be entered vertically and a saddle 9 window
//! only horizontally, so the last move alone decides both cases.

use tracing::{debug, trace, warn};

use crate::error::{Result, VectorizeError};
use crate::grid::{GridSampler, GridToWorld, Resolution};

use super::mapper::WorldCursor;
use super::neighbor::{neighbor_code, NeighborCode};
use super::ring::Ring;
use super::visited::VisitedTracker;

/// Initial vertex capacity of a traced ring.
const RING_CAPACITY: usize = 64;

/// A single step between grid positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Grid offset of the move. North decreases the row index.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Apply the move, or `None` if it would leave the non-negative indices.
    pub fn step(self, x: usize, y: usize) -> Option<(usize, usize)> {
        let (dx, dy) = self.delta();
        Some((x.checked_add_signed(dx)?, y.checked_add_signed(dy)?))
    }
}

/// Pick the move for `code`, given the previous move.
///
/// Returns `None` for codes 0 and 15, where no boundary passes.
pub fn next_direction(code: NeighborCode, previous: Option<Direction>) -> Option<Direction> {
    match code.bits() {
        1 | 5 | 13 => Some(Direction::North),
        2 | 3 | 7 => Some(Direction::East),
        4 | 12 | 14 => Some(Direction::West),
        8 | 10 | 11 => Some(Direction::South),
        6 => Some(if previous == Some(Direction::North) {
            Direction::East
        } else {
            Direction::West
        }),
        9 => Some(if previous == Some(Direction::East) {
            Direction::North
        } else {
            Direction::South
        }),
        _ => None,
    }
}

/// Traces region boundaries on one grid for one target value.
///
/// The tracker is borrowed so callers control its lifetime; every code
/// evaluation marks cells in it.
pub struct BoundaryTracer<'a, G: ?Sized, T: ?Sized> {
    grid: &'a G,
    transform: &'a T,
    resolution: Resolution,
    target: f64,
    tracker: &'a mut VisitedTracker,
}

impl<'a, G, T> BoundaryTracer<'a, G, T>
where
    G: GridSampler + ?Sized,
    T: GridToWorld + ?Sized,
{
    pub fn new(
        grid: &'a G,
        transform: &'a T,
        resolution: Resolution,
        target: f64,
        tracker: &'a mut VisitedTracker,
    ) -> Self {
        Self {
            grid,
            transform,
            resolution,
            target,
            tracker,
        }
    }

    pub fn tracker(&self) -> &VisitedTracker {
        &*self.tracker
    }

    /// Neighbor code at `(x, y)`, marking the cells it reads.
    pub fn code_at(&mut self, x: usize, y: usize) -> NeighborCode {
        neighbor_code(self.grid, self.target, self.tracker, x, y)
    }

    /// Trace the ring passing through `(start_x, start_y)`.
    ///
    /// Returns `Ok(None)` for an interior start (code 15). A start outside
    /// the grid or with code 0 is an [`VectorizeError::InvalidStart`].
    pub fn trace(&mut self, start_x: usize, start_y: usize) -> Result<Option<Ring>> {
        if start_x >= self.grid.width() || start_y >= self.grid.height() {
            return Err(VectorizeError::InvalidStart {
                x: start_x,
                y: start_y,
                reason: "outside the grid",
            });
        }

        let code = self.code_at(start_x, start_y);
        if code.is_empty() {
            return Err(VectorizeError::InvalidStart {
                x: start_x,
                y: start_y,
                reason: "no boundary passes through this position",
            });
        }

        self.trace_from(start_x, start_y, code)
    }

    /// Like [`trace`](Self::trace), but a code 0 start yields `Ok(None)`.
    ///
    /// Used by the scan, whose start cells on row or column 0 can have an
    /// empty window.
    pub(crate) fn trace_candidate(&mut self, start_x: usize, start_y: usize) -> Result<Option<Ring>> {
        let code = self.code_at(start_x, start_y);
        if code.is_empty() {
            trace!(x = start_x, y = start_y, "skipping start with empty window");
            return Ok(None);
        }
        self.trace_from(start_x, start_y, code)
    }

    fn trace_from(
        &mut self,
        start_x: usize,
        start_y: usize,
        start_code: NeighborCode,
    ) -> Result<Option<Ring>> {
        if start_code.is_interior() {
            trace!(x = start_x, y = start_y, "interior start, no ring");
            return Ok(None);
        }

        let mut cursor = WorldCursor::start(self.transform, self.resolution, start_x, start_y)?;
        let mut points = Vec::with_capacity(RING_CAPACITY);
        points.push(cursor.position());

        let max_steps = 4 * (self.grid.width() + 2) * (self.grid.height() + 2);
        let (mut x, mut y) = (start_x, start_y);
        let mut code = start_code;
        let mut previous = None;
        let mut steps = 0usize;

        loop {
            let direction = next_direction(code, previous).ok_or(VectorizeError::IllegalCode {
                code: code.bits(),
                x,
                y,
            })?;
            points.push(cursor.advance(direction));
            (x, y) = direction
                .step(x, y)
                .ok_or(VectorizeError::Escaped { x, y })?;
            previous = Some(direction);
            steps += 1;

            if x == start_x && y == start_y {
                break;
            }
            if steps >= max_steps {
                return Err(VectorizeError::Unclosed {
                    x: start_x,
                    y: start_y,
                    steps,
                });
            }
            code = self.code_at(x, y);
        }

        let first = points[0];
        if let Some(last) = points.last_mut() {
            if !last.bit_eq(&first) {
                warn!(
                    x = start_x,
                    y = start_y,
                    dx = last.x - first.x,
                    dy = last.y - first.y,
                    "snapping closing vertex onto ring start"
                );
                *last = first;
            }
        }

        debug!(x = start_x, y = start_y, steps, "traced ring");
        Ok(Some(Ring::from_points(points)))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::grid::{FnGrid, IdentityTransform, RasterGrid};
    use crate::vectorize::mapper::WorldPoint;
    use approx::assert_relative_eq;

    /// Grid of NODATA with the listed cells set to 1.
    fn grid_with(width: usize, height: usize, cells: &[(usize, usize)]) -> RasterGrid {
        let mut grid = RasterGrid::empty(width, height);
        for &(x, y) in cells {
            grid.set(x, y, Some(1.0));
        }
        grid
    }

    fn trace_at(grid: &RasterGrid, x: usize, y: usize) -> Result<Option<Ring>> {
        let mut tracker = VisitedTracker::new(grid.width(), grid.height());
        BoundaryTracer::new(grid, &IdentityTransform, Resolution::unit(), 1.0, &mut tracker)
            .trace(x, y)
    }

    #[test]
    fn test_direction_table() {
        let expect = [
            (1, Direction::North),
            (2, Direction::East),
            (3, Direction::East),
            (4, Direction::West),
            (5, Direction::North),
            (7, Direction::East),
            (8, Direction::South),
            (10, Direction::South),
            (11, Direction::South),
            (12, Direction::West),
            (13, Direction::North),
            (14, Direction::West),
        ];
        for (bits, direction) in expect {
            let code = NeighborCode::from_bits(bits).unwrap();
            for previous in [None, Some(Direction::North), Some(Direction::East)] {
                assert_eq!(next_direction(code, previous), Some(direction), "code {bits}");
            }
        }
        assert_eq!(next_direction(NeighborCode::EMPTY, None), None);
        assert_eq!(next_direction(NeighborCode::INTERIOR, None), None);
    }

    #[test]
    fn test_saddle_tie_breaks() {
        let six = NeighborCode::from_bits(6).unwrap();
        let nine = NeighborCode::from_bits(9).unwrap();
        assert_eq!(next_direction(six, Some(Direction::North)), Some(Direction::East));
        assert_eq!(next_direction(six, Some(Direction::South)), Some(Direction::West));
        assert_eq!(next_direction(six, None), Some(Direction::West));
        assert_eq!(next_direction(nine, Some(Direction::East)), Some(Direction::North));
        assert_eq!(next_direction(nine, Some(Direction::West)), Some(Direction::South));
        assert_eq!(next_direction(nine, None), Some(Direction::South));
    }

    #[test]
    fn test_direction_step() {
        assert_eq!(Direction::North.step(2, 2), Some((2, 1)));
        assert_eq!(Direction::East.step(2, 2), Some((3, 2)));
        assert_eq!(Direction::South.step(2, 2), Some((2, 3)));
        assert_eq!(Direction::West.step(2, 2), Some((1, 2)));
        assert_eq!(Direction::North.step(0, 0), None);
        assert_eq!(Direction::West.step(0, 0), None);
    }

    #[test]
    fn test_single_cell_ring() {
        let grid = grid_with(3, 3, &[(1, 1)]);
        let ring = trace_at(&grid, 1, 1).unwrap().unwrap();
        let expected: Vec<WorldPoint> = [
            (1.5, 0.5),
            (1.5, 1.5),
            (0.5, 1.5),
            (0.5, 0.5),
            (1.5, 0.5),
        ]
        .into_iter()
        .map(WorldPoint::from)
        .collect();
        assert_eq!(ring.points(), expected.as_slice());
        assert!(ring.is_closed());
        assert_relative_eq!(ring.area(), 1.0);
    }

    #[test]
    fn test_empty_start_is_invalid() {
        let grid = grid_with(3, 3, &[(1, 1)]);
        assert!(matches!(
            trace_at(&grid, 0, 2),
            Err(VectorizeError::InvalidStart { x: 0, y: 2, .. })
        ));
    }

    #[test]
    fn test_out_of_grid_start_is_invalid() {
        let grid = grid_with(3, 3, &[(1, 1)]);
        assert!(matches!(
            trace_at(&grid, 3, 0),
            Err(VectorizeError::InvalidStart { .. })
        ));
        assert!(matches!(
            trace_at(&grid, 0, 3),
            Err(VectorizeError::InvalidStart { .. })
        ));
    }

    #[test]
    fn test_interior_start_has_no_ring() {
        let grid = RasterGrid::new(ndarray::Array2::from_elem((4, 4), 1.0), None);
        assert_eq!(trace_at(&grid, 1, 1).unwrap(), None);
    }

    #[test]
    fn test_saddle_start_goes_south() {
        // Diagonal pair: the window at (1, 1) is code 9 with no history.
        let grid = grid_with(4, 4, &[(1, 1), (2, 2)]);
        let ring = trace_at(&grid, 1, 1).unwrap().unwrap();
        let expected: Vec<WorldPoint> = [
            (1.5, 0.5),
            (1.5, -0.5),
            (2.5, -0.5),
            (2.5, 0.5),
            (1.5, 0.5),
        ]
        .into_iter()
        .map(WorldPoint::from)
        .collect();
        assert_eq!(ring.points(), expected.as_slice());
    }

    #[test]
    fn test_saddle_six_after_north_turns_east() {
        // Cells around (2, 2) with the (1, 1) corner missing; the window at
        // (1, 1) is code 6 and is entered moving north.
        let grid = grid_with(
            5,
            5,
            &[(2, 1), (3, 1), (3, 2), (3, 3), (2, 3), (1, 3), (1, 2)],
        );
        let ring = trace_at(&grid, 1, 2).unwrap().unwrap();
        assert_eq!(ring.len(), 5);
        assert!(ring.is_closed());
        assert_relative_eq!(ring.area(), 1.0);
    }

    #[test]
    fn test_saddle_nine_resolved_both_ways() {
        // Cells around (2, 2) with the (3, 1) corner missing. The trace
        // crosses the code 9 window at (2, 1) twice: once after an east
        // move (goes north) and once after a west move (goes south).
        let grid = grid_with(
            5,
            5,
            &[(1, 1), (2, 1), (1, 2), (1, 3), (2, 3), (3, 3), (3, 2)],
        );
        let ring = trace_at(&grid, 1, 1).unwrap().unwrap();
        assert_eq!(ring.len(), 17);
        assert!(ring.is_closed());
    }

    #[test]
    fn test_trace_marks_tracker() {
        let grid = grid_with(3, 3, &[(1, 1)]);
        let mut tracker = VisitedTracker::new(3, 3);
        BoundaryTracer::new(&grid, &IdentityTransform, Resolution::unit(), 1.0, &mut tracker)
            .trace(1, 1)
            .unwrap();
        // Only (1, 1) holds a sample; the rest is NODATA.
        assert_eq!(tracker.visited_cells().collect::<Vec<_>>(), vec![(1, 1)]);
    }

    #[test]
    fn test_resolution_scales_ring() {
        let grid = grid_with(3, 3, &[(1, 1)]);
        let mut tracker = VisitedTracker::new(3, 3);
        let res = Resolution::new(10.0, 5.0).unwrap();
        let ring = BoundaryTracer::new(&grid, &IdentityTransform, res, 1.0, &mut tracker)
            .trace(1, 1)
            .unwrap()
            .unwrap();
        assert_eq!(ring.points()[0], WorldPoint::new(6.0, -1.5));
        assert_relative_eq!(ring.area(), 50.0);
    }

    #[test]
    fn test_transform_failure_propagates() {
        let grid = grid_with(3, 3, &[(1, 1)]);
        let mut tracker = VisitedTracker::new(3, 3);
        let failing = |_: usize, _: usize| -> Result<(f64, f64)> {
            Err(VectorizeError::Transform("no georeference".into()))
        };
        let err = BoundaryTracer::new(&grid, &failing, Resolution::unit(), 1.0, &mut tracker)
            .trace(1, 1)
            .unwrap_err();
        assert_eq!(err, VectorizeError::Transform("no georeference".into()));
    }

    #[test]
    fn test_cell_changing_mid_trace_is_illegal() {
        // (1, 1) is a target for its first read only, so the window north
        // of it comes back empty.
        let reads = Cell::new(0);
        let grid = FnGrid::new(4, 4, |x, y| {
            if (x, y) != (1, 1) {
                return Some(0.0);
            }
            reads.set(reads.get() + 1);
            Some(if reads.get() == 1 { 1.0 } else { 0.0 })
        });
        let mut tracker = VisitedTracker::new(4, 4);
        let err =
            BoundaryTracer::new(&grid, &IdentityTransform, Resolution::unit(), 1.0, &mut tracker)
                .trace(1, 1)
                .unwrap_err();
        assert_eq!(err, VectorizeError::IllegalCode { code: 0, x: 1, y: 0 });
    }

    #[test]
    fn test_cycle_away_from_start_is_unclosed() {
        // The start window at (4, 2) sees (4, 3) once and steps west onto
        // the loop around (3, 3), which never passes (4, 2) again.
        let reads = Cell::new(0);
        let grid = FnGrid::new(6, 6, |x, y| match (x, y) {
            (3, 3) => Some(1.0),
            (4, 3) => {
                reads.set(reads.get() + 1);
                Some(if reads.get() == 1 { 1.0 } else { 0.0 })
            }
            _ => Some(0.0),
        });
        let mut tracker = VisitedTracker::new(6, 6);
        let err =
            BoundaryTracer::new(&grid, &IdentityTransform, Resolution::unit(), 1.0, &mut tracker)
                .trace(4, 2)
                .unwrap_err();
        assert_eq!(
            err,
            VectorizeError::Unclosed {
                x: 4,
                y: 2,
                steps: 4 * 8 * 8
            }
        );
    }

    #[test]
    fn test_edge_codes_never_point_out() {
        // Row 0 and column 0 never read as target, so a window there lacks
        // its upper or left bits and cannot send the walk below index 0.
        let previous = [
            None,
            Some(Direction::North),
            Some(Direction::East),
            Some(Direction::South),
            Some(Direction::West),
        ];
        for bits in 1..15u8 {
            let code = NeighborCode::from_bits(bits).unwrap();
            let upper = NeighborCode::UPPER_LEFT | NeighborCode::UPPER_RIGHT;
            let left = NeighborCode::UPPER_LEFT | NeighborCode::LOWER_LEFT;
            for prev in previous {
                let direction = next_direction(code, prev);
                if bits & upper == 0 {
                    assert_ne!(direction, Some(Direction::North), "code {bits}");
                }
                if bits & left == 0 {
                    assert_ne!(direction, Some(Direction::West), "code {bits}");
                }
            }
        }
    }
}
