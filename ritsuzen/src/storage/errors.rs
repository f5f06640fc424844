//! Storage error types.

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure in a file-backed port
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored blob could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Write would exceed the port's capacity
    #[error("Storage quota exceeded: {required} bytes required, {quota} available")]
    QuotaExceeded { required: usize, quota: usize },

    /// Participant master not found
    #[error("Participant master not found: {0}")]
    MasterNotFound(String),

    /// Participant master rejected by validation
    #[error("Invalid participant master: {0}")]
    InvalidMaster(String),

    /// Import payload has the wrong shape
    #[error("Invalid import data: {0}")]
    InvalidImport(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
