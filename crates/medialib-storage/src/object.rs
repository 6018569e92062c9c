use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, Attributes, ObjectStoreExt, PutOptions, PutPayload};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;

/// Connection settings for an S3-compatible bucket fronted by a CDN.
#[derive(Clone, Debug)]
pub struct S3Settings {
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// CDN origin, e.g. `https://cdn.poehali.dev`
    pub cdn_base_url: String,
}

impl S3Settings {
    /// Public URL prefix: `{cdn}/projects/{access_key_id}/bucket`.
    pub fn public_url_prefix(&self) -> String {
        format!(
            "{}/projects/{}/bucket",
            self.cdn_base_url.trim_end_matches('/'),
            self.access_key_id
        )
    }
}

/// Storage backed by any `object_store` implementation.
///
/// Public URLs are `{public_url_prefix}/{key}`.
#[derive(Clone)]
pub struct ObjectStorage {
    store: Arc<dyn object_store::ObjectStore>,
    backend: StorageBackend,
    public_url_prefix: String,
    // LocalFileSystem rejects object attributes
    store_content_type: bool,
}

impl std::fmt::Debug for ObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStorage")
            .field("store", &self.store.to_string())
            .field("backend", &self.backend)
            .field("public_url_prefix", &self.public_url_prefix)
            .finish()
    }
}

impl ObjectStorage {
    /// S3-compatible bucket with path-style requests against a custom endpoint.
    pub fn s3(settings: S3Settings) -> StorageResult<Self> {
        let store = AmazonS3Builder::new()
            .with_endpoint(settings.endpoint.clone())
            .with_allow_http(settings.endpoint.starts_with("http://"))
            .with_virtual_hosted_style_request(false)
            .with_bucket_name(settings.bucket.clone())
            .with_region(settings.region.clone())
            .with_access_key_id(settings.access_key_id.clone())
            .with_secret_access_key(settings.secret_access_key.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        tracing::debug!(
            endpoint = %settings.endpoint,
            bucket = %settings.bucket,
            "S3 object store configured"
        );

        Ok(Self {
            store: Arc::new(store),
            backend: StorageBackend::S3,
            public_url_prefix: settings.public_url_prefix(),
            store_content_type: true,
        })
    }

    /// Directory on the local filesystem, served elsewhere at `base_url`.
    pub async fn local(base_path: impl Into<PathBuf>, base_url: &str) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        let store = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self {
            store: Arc::new(store),
            backend: StorageBackend::Local,
            public_url_prefix: base_url.trim_end_matches('/').to_string(),
            store_content_type: false,
        })
    }

    /// Process-local storage for tests and throwaway development runs.
    pub fn in_memory(base_url: &str) -> Self {
        Self::from_store(Arc::new(InMemory::new()), base_url)
    }

    /// Wrap an existing store, e.g. to inspect written objects in tests.
    pub fn from_store(store: Arc<dyn object_store::ObjectStore>, base_url: &str) -> Self {
        Self {
            store,
            backend: StorageBackend::Memory,
            public_url_prefix: base_url.trim_end_matches('/').to_string(),
            store_content_type: true,
        }
    }

    fn location(storage_key: &str) -> StorageResult<Path> {
        if storage_key.is_empty() || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }
        Ok(Path::from(storage_key))
    }
}

#[async_trait]
impl Storage for ObjectStorage {
    async fn put(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        let location = Self::location(storage_key)?;
        let size = data.len() as u64;
        let start = Instant::now();

        let mut attributes = Attributes::new();
        if self.store_content_type {
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
        }
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        object_store::ObjectStore::put_opts(
            self.store.as_ref(),
            &location,
            PutPayload::from(data),
            opts,
        )
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                backend = %self.backend,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Object upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            backend = %self.backend,
            key = %storage_key,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );

        Ok(self.public_url(storage_key))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let location = Self::location(storage_key)?;
        let start = Instant::now();

        match self.store.delete(&location).await {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    backend = %self.backend,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            backend = %self.backend,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object delete successful"
        );
        Ok(())
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.public_url_prefix, storage_key)
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        let key = url
            .strip_prefix(self.public_url_prefix.as_str())?
            .strip_prefix('/')?;
        if key.is_empty() || key.split('/').any(|part| part.is_empty() || part == "..") {
            return None;
        }
        Some(key.to_string())
    }

    async fn check(&self) -> StorageResult<()> {
        object_store::ObjectStore::list_with_delimiter(self.store.as_ref(), None)
            .await
            .map(|_| ())
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }
}
