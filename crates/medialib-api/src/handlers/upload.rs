use crate::error::{parse_json_body, ErrorResponse, HttpAppError};
use crate::state::MediaState;
use axum::{body::Bytes, extract::State, response::IntoResponse, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use medialib_core::models::{UploadRequest, UploadResponse, MISSING_UPLOAD_FIELDS};
use medialib_core::AppError;
use medialib_storage::keys::generate_upload_key;

/// Bodies that carry no upload at all.
fn is_empty_body(body: &[u8]) -> bool {
    let trimmed = body.trim_ascii();
    trimmed.is_empty() || trimmed == b"{}"
}

/// Decode the standard base64 alphabet, ignoring line breaks and other
/// ASCII whitespace from MIME-wrapped payloads.
fn decode_file(encoded: &str) -> Result<Vec<u8>, AppError> {
    let compact: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact)
        .map_err(|e| AppError::InvalidPayload(e.to_string()))
}

#[utoipa::path(
    post,
    path = "/api/v0/upload",
    tag = "upload",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing required fields", body = ErrorResponse),
        (status = 500, description = "Invalid base64 payload or storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(operation = "upload_file", size_bytes = body.len())
)]
pub async fn upload_file(
    State(state): State<MediaState>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    if is_empty_body(&body) {
        return Err(AppError::InvalidInput(MISSING_UPLOAD_FIELDS.to_string()).into());
    }

    let request: UploadRequest = parse_json_body(&body)?;
    let upload = request.validate()?;

    let data = decode_file(&upload.file)?;

    let storage_key = generate_upload_key(upload.folder, &upload.file_name);
    let url = state
        .storage
        .put(&storage_key, Bytes::from(data), &upload.file_type)
        .await?;

    tracing::info!(
        storage_key = %storage_key,
        folder = %upload.folder,
        file_type = %upload.file_type,
        "File uploaded"
    );

    Ok(Json(UploadResponse {
        success: true,
        url,
        file_name: upload.file_name,
    }))
}
