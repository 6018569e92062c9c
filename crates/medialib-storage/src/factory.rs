use crate::{ObjectStorage, S3Settings, Storage, StorageBackend, StorageError, StorageResult};
use medialib_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        StorageBackend::S3 => {
            let access_key_id = config.aws_access_key_id.clone().ok_or_else(|| {
                StorageError::ConfigError("AWS_ACCESS_KEY_ID not configured".to_string())
            })?;
            let secret_access_key = config.aws_secret_access_key.clone().ok_or_else(|| {
                StorageError::ConfigError("AWS_SECRET_ACCESS_KEY not configured".to_string())
            })?;

            let storage = ObjectStorage::s3(S3Settings {
                endpoint: config.s3_endpoint.clone(),
                bucket: config.s3_bucket.clone(),
                region: config.s3_region.clone(),
                access_key_id,
                secret_access_key,
                cdn_base_url: config.cdn_base_url.clone(),
            })?;
            Ok(Arc::new(storage))
        }

        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.as_deref().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = ObjectStorage::local(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage - uploaded files are lost on restart");
            let base_url = config
                .local_storage_base_url
                .as_deref()
                .unwrap_or("http://localhost/files");
            Ok(Arc::new(ObjectStorage::in_memory(base_url)))
        }
    }
}
