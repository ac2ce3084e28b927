//! On-device key-value persistence
//!
//! A single flat namespace of string keys holding the token, the device
//! identifier, the tracking flag and the last check-in/check-out records.
//! The store is opaque about content; callers own serialization.

mod file;
mod memory;

use async_trait::async_trait;
use fieldtrace_domain::FieldtraceError;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage failures are recoverable; callers decide whether to surface or
/// proceed optimistically.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<StorageError> for FieldtraceError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Asynchronous key-value persistence surviving process restarts.
///
/// Implementations must be safe to call concurrently; last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any existing one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key; deleting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
