//! Grid-index to world-coordinate mapping for traced boundaries.
//!
//! Only the start of a ring goes through the transform. Every following
//! vertex is reached by adding or subtracting one resolution step to the
//! running position, so vertices are reproducible bit for bit under the
//! same sequence of moves.

use crate::error::Result;
use crate::grid::{GridToWorld, Resolution};

use super::tracer::Direction;

/// A point in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &WorldPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Perpendicular distance from this point to a line segment.
    pub fn distance_to_segment(&self, start: &WorldPoint, end: &WorldPoint) -> f64 {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let length_sq = dx * dx + dy * dy;

        if length_sq == 0.0 {
            return self.distance_to(start);
        }

        let t = (((self.x - start.x) * dx + (self.y - start.y) * dy) / length_sq).clamp(0.0, 1.0);
        let px = self.x - (start.x + t * dx);
        let py = self.y - (start.y + t * dy);
        (px * px + py * py).sqrt()
    }

    /// Bitwise equality, distinguishing `0.0` from `-0.0`.
    pub fn bit_eq(&self, other: &WorldPoint) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl From<(f64, f64)> for WorldPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<WorldPoint> for (f64, f64) {
    fn from(p: WorldPoint) -> Self {
        (p.x, p.y)
    }
}

/// World position of grid index `(gx, gy)`, shifted by half a cell.
pub fn to_world<T: GridToWorld + ?Sized>(
    transform: &T,
    resolution: Resolution,
    gx: usize,
    gy: usize,
) -> Result<WorldPoint> {
    let (wx, wy) = transform.grid_to_world(gx, gy)?;
    Ok(WorldPoint::new(
        wx + resolution.half_x(),
        wy - resolution.half_y(),
    ))
}

/// Running world position of a trace.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WorldCursor {
    position: WorldPoint,
    resolution: Resolution,
}

impl WorldCursor {
    pub(crate) fn start<T: GridToWorld + ?Sized>(
        transform: &T,
        resolution: Resolution,
        gx: usize,
        gy: usize,
    ) -> Result<Self> {
        Ok(Self {
            position: to_world(transform, resolution, gx, gy)?,
            resolution,
        })
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.position
    }

    /// Step one cell. North is up in world space, so it grows `y`.
    pub(crate) fn advance(&mut self, direction: Direction) -> WorldPoint {
        match direction {
            Direction::North => self.position.y += self.resolution.y,
            Direction::South => self.position.y -= self.resolution.y,
            Direction::East => self.position.x += self.resolution.x,
            Direction::West => self.position.x -= self.resolution.x,
        }
        self.position
    }
}
