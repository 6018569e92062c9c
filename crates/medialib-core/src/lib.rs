//! Medialib Core Library
//!
//! Domain models, error types and configuration shared by the database,
//! storage and HTTP crates of the media library backend.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
