//! Route configuration and setup.
//!
//! Each service owns its CORS layer so preflight responses advertise only
//! the methods that service accepts. Health checks live in [health](health).

mod health;

use crate::api_doc;
use crate::constants::{API_PREFIX, OPENAPI_PATH};
use crate::handlers::{self, method_not_allowed};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .merge(content_routes())
        .merge(upload_routes())
        .merge(health::health_routes())
        .route(OPENAPI_PATH, get(openapi_json))
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_PATH).path("/docs"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET|POST|DELETE|OPTIONS /api/v0/content`
fn content_routes() -> Router<Arc<AppState>> {
    let cors = cors_layer(&[Method::GET, Method::POST, Method::DELETE, Method::OPTIONS]);

    Router::new()
        .route(
            &format!("{}/content", API_PREFIX),
            get(handlers::content::list_content)
                // get() would otherwise answer HEAD with the list
                .head(method_not_allowed)
                .post(handlers::content::create_content)
                .delete(handlers::content::delete_content)
                .fallback(method_not_allowed),
        )
        .layer(cors)
}

/// `POST|OPTIONS /api/v0/upload`
fn upload_routes() -> Router<Arc<AppState>> {
    let cors = cors_layer(&[Method::POST, Method::OPTIONS]);

    Router::new()
        .route(
            &format!("{}/upload", API_PREFIX),
            post(handlers::upload::upload_file).fallback(method_not_allowed),
        )
        // Uploads arrive base64-encoded in a single JSON body
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
}

/// Any origin; preflight answers with the given methods and `content-type`.
fn cors_layer(methods: &[Method]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(methods.to_vec())
        .allow_headers([header::CONTENT_TYPE])
}

async fn openapi_json() -> impl IntoResponse {
    Json(api_doc::get_openapi_spec())
}
