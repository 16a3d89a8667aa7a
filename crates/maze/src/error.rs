/// Errors from grid construction, carving and placement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("invalid grid dimensions {rows}x{cols}: both must be at least 3")]
    InvalidGridDimensions { rows: usize, cols: usize },
    #[error("invalid carve start ({row}, {col}): must be an odd-aligned interior cell")]
    InvalidStart { row: usize, col: usize },
    #[error("invalid layout at row {row}: {reason}")]
    InvalidLayout { row: usize, reason: String },
    #[error("placement exhausted: requested {requested} cells, {available} available")]
    PlacementExhausted { requested: usize, available: usize },
}
