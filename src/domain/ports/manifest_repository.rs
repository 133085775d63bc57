//! ManifestRepository port - abstraction for manifest persistence
//!
//! The use case hands over a finished JSON document; the repository owns
//! locking, append-mode merging and the atomic write.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// Result type for manifest store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Manifest store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("timed out after {waited_ms}ms waiting for the manifest lock {path}")]
    LockTimeout { path: PathBuf, waited_ms: u128 },

    #[error("failed to lock manifest {path}: {message}")]
    Lock { path: PathBuf, message: String },

    #[error("failed to read manifest {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("manifest file corrupted: {path}: {message}")]
    Corrupted { path: PathBuf, message: String },

    #[error("cannot append to manifest {path}: {what} is not a JSON object")]
    NotAnObject { path: PathBuf, what: &'static str },

    #[error("failed to serialize manifest: {message}")]
    Serialization { message: String },

    #[error("failed to write manifest {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Abstract store for manifest documents
pub trait ManifestRepository {
    /// Load the JSON object stored at `path`; `None` if there is no file
    fn load(&self, path: &Path) -> StoreResult<Option<Map<String, Value>>>;

    /// Replace the file at `path` with `document`
    fn save(&self, document: &Value, path: &Path) -> StoreResult<()>;

    /// Write `document` to `path` as one locked read-merge-write cycle.
    ///
    /// With `append`, keys of an existing manifest not present in `document`
    /// are kept. Returns the document actually written.
    fn update(&self, document: Value, path: &Path, append: bool) -> StoreResult<Value>;
}
