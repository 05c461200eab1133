//! Error types for glance-history.

use thiserror::Error;

/// History storage error types.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Platform data directory could not be determined.
    #[error("Could not determine home/data directory")]
    DataDirNotFound,
}

/// Result type for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;
