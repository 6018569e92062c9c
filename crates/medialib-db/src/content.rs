use medialib_core::models::{
    AudioContent, ContentKind, ContentList, DeletedContent, NewContent, VideoContent,
};
use medialib_core::AppError;
use sqlx::{PgPool, Postgres};

/// Trait for content repository operations
/// This abstracts the database implementation (PostgreSQL)
#[async_trait::async_trait]
pub trait ContentRepositoryTrait: Send + Sync {
    /// All rows of one table, newest first.
    async fn list(&self, kind: ContentKind) -> Result<ContentList, AppError>;

    /// Insert a row and return the id assigned by the store.
    async fn create(&self, content: NewContent) -> Result<i64, AppError>;

    /// Delete a row by id. `None` when no row had that id.
    async fn delete(&self, kind: ContentKind, id: i64) -> Result<Option<DeletedContent>, AppError>;

    /// Round-trip to the store, for readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Repository for the audio and video content tables
#[derive(Clone)]
pub struct PostgresContentRepository {
    pool: PgPool,
    schema: String,
}

pub type ContentRepository = PostgresContentRepository;

impl PostgresContentRepository {
    /// `schema` must be a validated SQL identifier (see `Config::validate`).
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

    fn table(&self, kind: ContentKind) -> String {
        format!("{}.{}", self.schema, kind.table_name())
    }
}

#[async_trait::async_trait]
impl ContentRepositoryTrait for PostgresContentRepository {
    #[tracing::instrument(skip(self), fields(db.table = %kind.table_name(), db.operation = "select"))]
    async fn list(&self, kind: ContentKind) -> Result<ContentList, AppError> {
        let mut conn = self.pool.acquire().await?;

        let list = match kind {
            ContentKind::Audio => {
                let rows = sqlx::query_as::<Postgres, AudioContent>(&format!(
                    r#"
                    SELECT id, title, author, description, duration, audio_url, created_at
                    FROM {}
                    ORDER BY created_at DESC, id DESC
                    "#,
                    self.table(kind)
                ))
                .fetch_all(&mut *conn)
                .await?;
                ContentList::Audio(rows)
            }
            ContentKind::Video => {
                let rows = sqlx::query_as::<Postgres, VideoContent>(&format!(
                    r#"
                    SELECT id, title, description, duration, video_url, thumbnail_url, created_at
                    FROM {}
                    ORDER BY created_at DESC, id DESC
                    "#,
                    self.table(kind)
                ))
                .fetch_all(&mut *conn)
                .await?;
                ContentList::Video(rows)
            }
        };

        tracing::debug!(rows = list.len(), "Listed content");
        Ok(list)
    }

    #[tracing::instrument(skip(self, content), fields(db.table = %content.kind().table_name(), db.operation = "insert"))]
    async fn create(&self, content: NewContent) -> Result<i64, AppError> {
        let mut conn = self.pool.acquire().await?;
        let table = self.table(content.kind());

        let id = match content {
            NewContent::Audio(audio) => {
                sqlx::query_scalar::<Postgres, i64>(&format!(
                    r#"
                    INSERT INTO {} (title, author, description, duration, audio_url)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                    table
                ))
                .bind(audio.title)
                .bind(audio.author)
                .bind(audio.description)
                .bind(audio.duration)
                .bind(audio.audio_url)
                .fetch_one(&mut *conn)
                .await?
            }
            NewContent::Video(video) => {
                sqlx::query_scalar::<Postgres, i64>(&format!(
                    r#"
                    INSERT INTO {} (title, description, duration, video_url, thumbnail_url)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                    table
                ))
                .bind(video.title)
                .bind(video.description)
                .bind(video.duration)
                .bind(video.video_url)
                .bind(video.thumbnail_url)
                .fetch_one(&mut *conn)
                .await?
            }
        };

        tracing::info!(db.record_id = id, "Content row created");
        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(db.table = %kind.table_name(), db.operation = "delete", db.record_id = id))]
    async fn delete(&self, kind: ContentKind, id: i64) -> Result<Option<DeletedContent>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let table = self.table(kind);

        let file_urls = match kind {
            ContentKind::Audio => sqlx::query_scalar::<Postgres, Option<String>>(&format!(
                "DELETE FROM {} WHERE id = $1 RETURNING audio_url",
                table
            ))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .map(|url| url.into_iter().collect::<Vec<_>>()),
            ContentKind::Video => {
                sqlx::query_as::<Postgres, (Option<String>, Option<String>)>(&format!(
                    "DELETE FROM {} WHERE id = $1 RETURNING video_url, thumbnail_url",
                    table
                ))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?
                .map(|(video_url, thumbnail_url)| {
                    video_url.into_iter().chain(thumbnail_url).collect::<Vec<_>>()
                })
            }
        };

        match file_urls {
            Some(file_urls) => {
                tracing::info!("Content row deleted");
                Ok(Some(DeletedContent {
                    kind,
                    id,
                    file_urls,
                }))
            }
            None => {
                tracing::debug!("No content row with this id");
                Ok(None)
            }
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}
