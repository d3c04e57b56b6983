//! Error types for the LifeGrid engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LifeError>;

#[derive(Debug, Error)]
pub enum LifeError {
    #[error("Invalid grid dimensions: {columns}x{rows}")]
    InvalidDimension { columns: usize, rows: usize },

    #[error("Cell state length mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Corrupt map: {0}")]
    CorruptMap(String),

    #[error("Step for generation {generation} was aborted")]
    StepAborted { generation: u64 },

    #[error("Cell index {index} out of range for grid of {len} cells")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid speed: {0} steps per second")]
    InvalidSpeed(u32),

    #[error("Invalid map name: '{0}'")]
    InvalidMapName(String),

    #[error("Map not found: '{0}'")]
    MapNotFound(String),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
