//! Medialib Storage Library
//!
//! Object storage for uploaded media files, built on `object_store` so the
//! same code drives an S3-compatible bucket, a local directory or memory.
//!
//! # Storage key format
//!
//! Uploaded files are stored under `{kind}/{uuid}.{extension}` where kind is
//! `audio` or `video`. Key generation lives in the `keys` module.

pub mod factory;
pub mod keys;
pub mod object;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use medialib_core::StorageBackend;
pub use object::{ObjectStorage, S3Settings};
pub use traits::{Storage, StorageError, StorageResult};
