//! Per-cell visitation flags.

/// Flat `width x height` flag array indexed by `y * width + x`.
///
/// Flags are set as a side effect of reading a cell during neighbor-code
/// evaluation and are never cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisitedTracker {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl VisitedTracker {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_visited(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    /// Mark `(x, y)`. Indices outside the tracker are ignored.
    #[inline]
    pub fn mark(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = true;
        }
    }

    /// Number of cells marked so far.
    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v).count()
    }

    /// Marked cells in row-major order.
    pub fn visited_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v)
            .map(move |(i, _)| (i % width, i / width))
    }
}
