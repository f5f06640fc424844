//! Export error types.

use thiserror::Error;

/// Export and import errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Import file does not have the export layout
    #[error("Invalid import format: {0}")]
    InvalidFormat(String),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
