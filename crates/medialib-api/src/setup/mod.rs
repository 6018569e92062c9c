//! Application setup and initialization
//!
//! Builds every long-lived client once and hands them to the router through
//! [`AppState`].

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use medialib_core::Config;
use medialib_db::PostgresContentRepository;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: &Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(config).await?;
    let storage = storage::setup_storage(config).await?;

    let repository = Arc::new(PostgresContentRepository::new(
        pool,
        config.db_schema.clone(),
    ));
    let state = Arc::new(AppState::new(
        repository,
        storage,
        config.delete_stored_files,
    ));

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
