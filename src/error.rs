use thiserror::Error;

/// Failures when constructing or editing a [Grid](crate::grid::Grid).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("matrix size does not fit: declared {width}x{height}, matrix is {matrix_width}x{matrix_height}")]
    SizeMismatch {
        width: usize,
        height: usize,
        matrix_width: usize,
        matrix_height: usize,
    },

    #[error("matrix row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

/// Failures when parsing or validating a [PathFinderConfig](crate::pathfinder::PathFinderConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("unknown heuristic: {0}")]
    UnknownHeuristic(String),

    #[error("unknown diagonal movement: {0}")]
    UnknownDiagonalMovement(String),

    #[error("heuristic weight must be positive and finite, got {0}")]
    InvalidWeight(f64),
}
