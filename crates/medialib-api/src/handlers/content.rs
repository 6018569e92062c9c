use crate::error::{parse_json_body, ErrorResponse, HttpAppError};
use crate::state::ContentState;
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use medialib_core::models::{
    AudioContent, ContentKind, CreateContentResponse, NewAudio, NewContent, SuccessResponse,
};
use medialib_core::AppError;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub id: Option<String>,
}

impl ContentQuery {
    fn kind(&self) -> Result<ContentKind, AppError> {
        ContentKind::parse_or_default(self.content_type.as_deref())
    }

    fn id(&self) -> Result<i64, AppError> {
        let raw = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::InvalidInput("Missing id parameter".to_string()))?;
        raw.parse()
            .map_err(|_| AppError::InvalidInput("Invalid id parameter".to_string()))
    }
}

#[utoipa::path(
    get,
    path = "/api/v0/content",
    tag = "content",
    params(
        ("type" = Option<String>, Query, description = "Content table: audio (default) or video")
    ),
    responses(
        (status = 200, description = "All rows of the table, newest first", body = Vec<AudioContent>),
        (status = 400, description = "Unknown content type", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "list_content"))]
pub async fn list_content(
    State(state): State<ContentState>,
    query: Result<Query<ContentQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(query) = query?;
    let kind = query.kind()?;

    let list = state.repository.list(kind).await?;
    Ok(Json(list))
}

#[utoipa::path(
    post,
    path = "/api/v0/content",
    tag = "content",
    request_body(
        content = NewAudio,
        description = "Fields of the new row plus `contentType` (audio or video). Video rows take NewVideo fields."
    ),
    responses(
        (status = 201, description = "Row created", body = CreateContentResponse),
        (status = 400, description = "Missing or unknown contentType", body = ErrorResponse),
        (status = 500, description = "Malformed body or database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(operation = "create_content", content_type = tracing::field::Empty)
)]
pub async fn create_content(
    State(state): State<ContentState>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let value: serde_json::Value = parse_json_body(&body)?;
    let content = NewContent::from_json(value)?;
    tracing::Span::current().record("content_type", content.kind().as_str());

    let id = state.repository.create(content).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateContentResponse { success: true, id }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v0/content",
    tag = "content",
    params(
        ("id" = i64, Query, description = "Row id"),
        ("type" = Option<String>, Query, description = "Content table: audio (default) or video")
    ),
    responses(
        (status = 200, description = "Row removed, or no row had that id", body = SuccessResponse),
        (status = 400, description = "Missing or invalid id, or unknown content type", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "delete_content"))]
pub async fn delete_content(
    State(state): State<ContentState>,
    query: Result<Query<ContentQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(query) = query?;
    let id = query.id()?;
    let kind = query.kind()?;

    if let Some(deleted) = state.repository.delete(kind, id).await? {
        state.lifecycle.delete_content_files(&deleted).await;
    }

    Ok(Json(SuccessResponse { success: true }))
}
