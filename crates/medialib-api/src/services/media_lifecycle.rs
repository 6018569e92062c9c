//! Media lifecycle operations: removal of stored files after a row is deleted.
//!
//! Keeps handler logic thin and allows unit testing without HTTP.

use futures::stream::{self, StreamExt};
use medialib_core::models::DeletedContent;
use medialib_storage::Storage;
use std::sync::Arc;

/// Deletes the objects a removed content row pointed at.
#[derive(Clone)]
pub struct MediaLifecycleService {
    storage: Arc<dyn Storage>,
    delete_stored_files: bool,
}

impl MediaLifecycleService {
    pub fn new(storage: Arc<dyn Storage>, delete_stored_files: bool) -> Self {
        Self {
            storage,
            delete_stored_files,
        }
    }

    /// Best-effort: failures are logged and never surface to the caller.
    /// URLs that do not belong to the configured storage are left alone.
    /// Returns the number of objects deleted.
    pub async fn delete_content_files(&self, deleted: &DeletedContent) -> usize {
        if !self.delete_stored_files {
            return 0;
        }

        let keys: Vec<String> = deleted
            .file_urls
            .iter()
            .filter_map(|url| {
                let key = self.storage.key_for_url(url);
                if key.is_none() {
                    tracing::debug!(url = %url, "Skipping file outside configured storage");
                }
                key
            })
            .collect();

        let results = stream::iter(keys)
            .map(|key| {
                let storage = self.storage.clone();
                async move {
                    match storage.delete(&key).await {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                storage_key = %key,
                                "Failed to delete stored file for removed content"
                            );
                            false
                        }
                    }
                }
            })
            .buffer_unordered(4)
            .collect::<Vec<_>>()
            .await;

        let removed = results.into_iter().filter(|ok| *ok).count();
        if removed > 0 {
            tracing::info!(
                content_type = %deleted.kind,
                content_id = deleted.id,
                removed,
                "Stored files removed"
            );
        }
        removed
    }
}
