//! Application state and sub-state extractors.
//!
//! The database handle and storage client are built once at startup and
//! injected here; handlers never create their own clients.

use crate::services::media_lifecycle::MediaLifecycleService;
use axum::extract::FromRef;
use medialib_db::ContentRepositoryTrait;
use medialib_storage::Storage;
use std::sync::Arc;

/// Content table access plus cleanup of the files rows point at.
#[derive(Clone)]
pub struct ContentState {
    pub repository: Arc<dyn ContentRepositoryTrait>,
    pub lifecycle: MediaLifecycleService,
}

/// Object storage used by uploads.
#[derive(Clone)]
pub struct MediaState {
    pub storage: Arc<dyn Storage>,
}

#[derive(Clone)]
pub struct AppState {
    pub content: ContentState,
    pub media: MediaState,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn ContentRepositoryTrait>,
        storage: Arc<dyn Storage>,
        delete_stored_files: bool,
    ) -> Self {
        Self {
            content: ContentState {
                repository,
                lifecycle: MediaLifecycleService::new(storage.clone(), delete_stored_files),
            },
            media: MediaState { storage },
        }
    }
}

impl FromRef<Arc<AppState>> for ContentState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.content.clone()
    }
}

impl FromRef<Arc<AppState>> for MediaState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.media.clone()
    }
}
