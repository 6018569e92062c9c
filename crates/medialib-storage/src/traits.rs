//! Storage abstraction trait
//!
//! Handlers talk to [`Storage`] only; backends differ in where bytes land and
//! how a key maps to a public URL.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// **Key format:** `{kind}/{uuid}.{extension}`. See the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `storage_key` with the given MIME type and return
    /// the public URL of the stored object.
    async fn put(&self, storage_key: &str, data: Bytes, content_type: &str)
        -> StorageResult<String>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Public URL under which `storage_key` is served.
    fn public_url(&self, storage_key: &str) -> String;

    /// Inverse of [`Storage::public_url`]: the key for a URL this storage
    /// produced, or `None` for foreign URLs.
    fn key_for_url(&self, url: &str) -> Option<String>;

    /// Cheap reachability check used by readiness probes.
    async fn check(&self) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
