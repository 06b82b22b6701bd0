use thiserror::Error;

/// Errors raised while extracting polygons from a grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorizeError {
    #[error("invalid start ({x}, {y}): {reason}")]
    InvalidStart {
        x: usize,
        y: usize,
        reason: &'static str,
    },

    #[error("illegal neighbor code {code} at ({x}, {y}) during trace")]
    IllegalCode { code: u8, x: usize, y: usize },

    #[error("trace starting at ({x}, {y}) did not close after {steps} steps")]
    Unclosed { x: usize, y: usize, steps: usize },

    #[error("trace left the index space at ({x}, {y})")]
    Escaped { x: usize, y: usize },

    #[error("resolution ({x}, {y}) must be finite and positive")]
    InvalidResolution { x: f64, y: f64 },

    #[error("grid shape mismatch: expected {expected} samples, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("visited tracker is {actual:?} cells but the grid is {expected:?}")]
    TrackerMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("invalid transform: {0}")]
    InvalidTransform(String),

    #[error("grid-to-world transform failed: {0}")]
    Transform(String),
}

/// Convenience type alias for results using [`VectorizeError`].
pub type Result<T> = std::result::Result<T, VectorizeError>;
