//! OpenAPI documentation.
//! Handler annotations use the literal `/api/v0` prefix (utoipa needs
//! compile-time paths); [`get_openapi_spec`] rewrites it to `API_PREFIX`.

use utoipa::OpenApi;

use crate::constants::API_PREFIX;
use crate::error;
use crate::handlers;
use medialib_core::models;

const OPENAPI_PATH_PLACEHOLDER: &str = "/api/v0";

fn transform_openapi_paths(spec: &mut utoipa::openapi::OpenApi, prefix: &str) {
    if OPENAPI_PATH_PLACEHOLDER == prefix {
        return;
    }
    let path_map = std::mem::take(&mut spec.paths.paths);
    for (key, item) in path_map {
        let new_key = key.replacen(OPENAPI_PATH_PLACEHOLDER, prefix, 1);
        spec.paths.paths.insert(new_key, item);
    }
}

/// The served OpenAPI document.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    transform_openapi_paths(&mut spec, API_PREFIX);
    spec
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Medialib API",
        version = "0.1.0",
        description = "Audio and video catalogue with base64 file upload to object storage. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::content::list_content,
        handlers::content::create_content,
        handlers::content::delete_content,
        handlers::upload::upload_file,
    ),
    components(
        schemas(
            models::ContentKind,
            models::AudioContent,
            models::VideoContent,
            models::NewAudio,
            models::NewVideo,
            models::CreateContentResponse,
            models::SuccessResponse,
            models::UploadRequest,
            models::UploadResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "content", description = "List, create and delete audio and video rows"),
        (name = "upload", description = "Upload base64-encoded files to object storage")
    )
)]
pub struct ApiDoc;
