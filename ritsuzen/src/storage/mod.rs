//! Persistence through an injected key-value storage port.
//!
//! The application state lives in one JSON blob: the current competition,
//! the competition history and the participant master roster.

pub mod errors;
pub mod manager;
pub mod models;
pub mod port;

pub use errors::{StorageError, StorageResult};
pub use manager::StorageManager;
pub use models::{StorageData, StorageInfo};
pub use port::{FileStorage, MemoryStorage, StoragePort};
