//! 2x2 neighborhood codes.
//!
//! The code at grid position `(x, y)` looks at the window whose upper-left
//! cell is `(x, y)`:
//!
//! ```text
//!   (x, y)   UL=1 | UR=2   (x+1, y)
//!   (x, y+1) LL=4 | LR=8   (x+1, y+1)
//! ```
//!
//! Reading a cell marks it visited whenever it holds a sample, whether or
//! not that sample matches the target.

use crate::grid::GridSampler;

use super::visited::VisitedTracker;

/// 4-bit marching-squares code of a 2x2 window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NeighborCode(u8);

impl NeighborCode {
    pub const UPPER_LEFT: u8 = 1;
    pub const UPPER_RIGHT: u8 = 2;
    pub const LOWER_LEFT: u8 = 4;
    pub const LOWER_RIGHT: u8 = 8;

    /// No target cell in the window.
    pub const EMPTY: NeighborCode = NeighborCode(0);
    /// All four cells are target cells.
    pub const INTERIOR: NeighborCode = NeighborCode(15);

    /// Wrap raw bits, rejecting anything above 15.
    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits <= 15).then_some(Self(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    pub fn is_interior(self) -> bool {
        self == Self::INTERIOR
    }

    /// True for codes a boundary passes through (1 to 14).
    pub fn is_boundary(self) -> bool {
        !self.is_empty() && !self.is_interior()
    }

    /// Codes 6 and 9, where diagonal corners match.
    pub fn is_saddle(self) -> bool {
        self.0 == 6 || self.0 == 9
    }
}

/// Whether `(x, y)` is a target cell, marking it visited if it holds a sample.
///
/// Index 0 on either axis counts as outside, as does anything beyond the
/// width or height. Column `width` and row `height` pass that test but have
/// no backing sample and read as NODATA.
#[inline]
pub(crate) fn is_target<G: GridSampler + ?Sized>(
    grid: &G,
    target: f64,
    tracker: &mut VisitedTracker,
    x: usize,
    y: usize,
) -> bool {
    let (width, height) = (grid.width(), grid.height());
    if x == 0 || x > width || y == 0 || y > height {
        return false;
    }
    if x == width || y == height {
        return false;
    }
    match grid.sample(x, y) {
        Some(value) => {
            tracker.mark(x, y);
            value == target
        }
        None => false,
    }
}

/// Evaluate the neighbor code at `(x, y)`.
pub fn neighbor_code<G: GridSampler + ?Sized>(
    grid: &G,
    target: f64,
    tracker: &mut VisitedTracker,
    x: usize,
    y: usize,
) -> NeighborCode {
    let mut bits = 0u8;
    if is_target(grid, target, tracker, x, y) {
        bits |= NeighborCode::UPPER_LEFT;
    }
    if is_target(grid, target, tracker, x + 1, y) {
        bits |= NeighborCode::UPPER_RIGHT;
    }
    if is_target(grid, target, tracker, x, y + 1) {
        bits |= NeighborCode::LOWER_LEFT;
    }
    if is_target(grid, target, tracker, x + 1, y + 1) {
        bits |= NeighborCode::LOWER_RIGHT;
    }
    NeighborCode(bits)
}
