//! Database setup and initialization

use anyhow::{Context, Result};
use medialib_core::Config;
use medialib_db::{prepare_schema, search_path_statement};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use std::time::Duration;

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    tracing::info!("Connecting to database...");

    let search_path = search_path_statement(&config.db_schema);
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .after_connect(move |conn, _meta| {
            let search_path = search_path.clone();
            Box::pin(async move {
                conn.execute(search_path.as_str()).await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        schema = %config.db_schema,
        "Database connected successfully"
    );

    if config.run_migrations {
        prepare_schema(&pool, &config.db_schema).await?;
    } else {
        tracing::info!("Skipping database migrations (RUN_MIGRATIONS=false)");
    }

    Ok(pool)
}
