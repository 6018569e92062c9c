//! Medialib database layer
//!
//! Repositories own no connection: they hold the injected pool and acquire
//! one pooled connection per call, which is returned on every exit path.

pub mod content;
pub mod schema;

pub use content::{ContentRepository, ContentRepositoryTrait, PostgresContentRepository};
pub use schema::{prepare_schema, search_path_statement, MIGRATOR};
