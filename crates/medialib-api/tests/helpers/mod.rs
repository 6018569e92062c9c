//! Test helpers: build AppState and router for integration tests.
//!
//! The router under test is the production one; only the collaborators are
//! swapped for in-memory versions, so no database or bucket is needed.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use medialib_api::constants;
use medialib_api::setup::routes;
use medialib_api::state::AppState;
use medialib_core::models::{
    AudioContent, ContentKind, ContentList, DeletedContent, NewContent, VideoContent,
};
use medialib_core::AppError;
use medialib_db::ContentRepositoryTrait;
use medialib_storage::{ObjectStorage, Storage};
use object_store::memory::InMemory;
use object_store::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

/// Public URL prefix of the test storage.
pub const STORAGE_BASE_URL: &str = "https://cdn.test/projects/TESTKEY/bucket";

/// API path prefix for tests (e.g. `/api/v0/content`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Content tables kept in process memory.
#[derive(Default)]
pub struct InMemoryContentRepository {
    next_id: AtomicI64,
    audio: Mutex<Vec<AudioContent>>,
    video: Mutex<Vec<VideoContent>>,
}

#[async_trait]
impl ContentRepositoryTrait for InMemoryContentRepository {
    async fn list(&self, kind: ContentKind) -> Result<ContentList, AppError> {
        let list = match kind {
            ContentKind::Audio => {
                let mut rows = self.audio.lock().unwrap().clone();
                rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
                ContentList::Audio(rows)
            }
            ContentKind::Video => {
                let mut rows = self.video.lock().unwrap().clone();
                rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
                ContentList::Video(rows)
            }
        };
        Ok(list)
    }

    async fn create(&self, content: NewContent) -> Result<i64, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created_at = Utc::now();
        match content {
            NewContent::Audio(audio) => self.audio.lock().unwrap().push(AudioContent {
                id,
                title: audio.title,
                author: audio.author,
                description: audio.description,
                duration: audio.duration,
                audio_url: audio.audio_url,
                created_at,
            }),
            NewContent::Video(video) => self.video.lock().unwrap().push(VideoContent {
                id,
                title: video.title,
                description: video.description,
                duration: video.duration,
                video_url: video.video_url,
                thumbnail_url: video.thumbnail_url,
                created_at,
            }),
        }
        Ok(id)
    }

    async fn delete(&self, kind: ContentKind, id: i64) -> Result<Option<DeletedContent>, AppError> {
        let file_urls = match kind {
            ContentKind::Audio => {
                let mut rows = self.audio.lock().unwrap();
                rows.iter()
                    .position(|row| row.id == id)
                    .map(|index| rows.remove(index))
                    .map(|row| row.audio_url.into_iter().collect::<Vec<_>>())
            }
            ContentKind::Video => {
                let mut rows = self.video.lock().unwrap();
                rows.iter()
                    .position(|row| row.id == id)
                    .map(|index| rows.remove(index))
                    .map(|row| {
                        row.video_url
                            .into_iter()
                            .chain(row.thumbnail_url)
                            .collect::<Vec<_>>()
                    })
            }
        };
        Ok(file_urls.map(|file_urls| DeletedContent {
            kind,
            id,
            file_urls,
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Repository whose every call fails like a lost database connection.
pub struct FailingContentRepository;

#[async_trait]
impl ContentRepositoryTrait for FailingContentRepository {
    async fn list(&self, _kind: ContentKind) -> Result<ContentList, AppError> {
        Err(unavailable())
    }

    async fn create(&self, _content: NewContent) -> Result<i64, AppError> {
        Err(unavailable())
    }

    async fn delete(
        &self,
        _kind: ContentKind,
        _id: i64,
    ) -> Result<Option<DeletedContent>, AppError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}

fn unavailable() -> AppError {
    AppError::Internal("connection refused".to_string())
}

/// Test application: server plus handles on the in-memory collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemory>,
    pub storage: Arc<dyn Storage>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Keys currently stored under `folder`.
    pub async fn stored_keys(&self, folder: &str) -> Vec<String> {
        let prefix = Path::from(folder);
        object_store::ObjectStore::list_with_delimiter(self.store.as_ref(), Some(&prefix))
            .await
            .expect("Failed to list test storage")
            .objects
            .into_iter()
            .map(|meta| meta.location.to_string())
            .collect()
    }
}

/// Setup test app with an in-memory repository and storage.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(Arc::new(InMemoryContentRepository::default()), true)
}

pub fn setup_test_app_with(
    repository: Arc<dyn ContentRepositoryTrait>,
    delete_stored_files: bool,
) -> TestApp {
    let store = Arc::new(InMemory::new());
    let storage: Arc<dyn Storage> =
        Arc::new(ObjectStorage::from_store(store.clone(), STORAGE_BASE_URL));

    let state = Arc::new(AppState::new(
        repository,
        storage.clone(),
        delete_stored_files,
    ));
    let router = routes::setup_routes(state);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        store,
        storage,
    }
}
