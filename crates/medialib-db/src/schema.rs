//! Schema bootstrap and migrations
//!
//! Content tables live in a dedicated schema. Migrations create them
//! unqualified, so every pooled connection runs [`search_path_statement`]
//! on connect and the schema itself is created before migrations run.

use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::PgPool;

/// Embedded migrations from `crates/medialib-db/migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Statement executed on each new connection so unqualified names resolve
/// to the content schema. `schema` must already be a validated identifier.
pub fn search_path_statement(schema: &str) -> String {
    format!("SET search_path TO {}, public", schema)
}

/// Create the content schema if needed and apply pending migrations.
#[tracing::instrument(skip(pool))]
pub async fn prepare_schema(pool: &PgPool, schema: &str) -> Result<()> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create schema {}", schema))?;

    MIGRATOR
        .run(pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!(schema = %schema, "Database migrations applied");
    Ok(())
}
