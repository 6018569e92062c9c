//! Content API integration tests.
//!
//! Run with: `cargo test -p medialib-api --test content_test`

mod helpers;

use axum::http::{header, Method, StatusCode};
use axum_test::TestResponse;
use bytes::Bytes;
use helpers::{api_path, setup_test_app, setup_test_app_with, FailingContentRepository};
use serde_json::{json, Value};
use std::sync::Arc;

fn assert_cors(response: &TestResponse) {
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

fn assert_error(response: &TestResponse, status: StatusCode, message: &str) {
    assert_eq!(response.status_code(), status);
    assert_cors(response);
    assert_eq!(response.json::<Value>(), json!({ "error": message }));
}

#[tokio::test]
async fn test_list_empty_table_returns_empty_array() {
    let app = setup_test_app();
    let client = app.client();

    let response = client.get(&api_path("/content")).await;

    assert_eq!(response.status_code(), 200);
    assert_cors(&response);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_create_then_list_audio() {
    let app = setup_test_app();
    let client = app.client();

    let response = client
        .post(&api_path("/content"))
        .json(&json!({
            "contentType": "audio",
            "title": "Morning Hymn",
            "author": "Parish Choir",
            "description": "Recorded live",
            "duration": "245",
            "audioUrl": "https://cdn.test/audio/1.mp3"
        }))
        .await;

    assert_eq!(response.status_code(), 201);
    assert_cors(&response);
    let created = response.json::<Value>();
    assert_eq!(created["success"], json!(true));
    let id = created["id"].as_i64().expect("id should be a number");

    let rows = client.get(&api_path("/content")).await.json::<Value>();
    let rows = rows.as_array().expect("list should be an array");
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row["id"], json!(id));
    assert_eq!(row["title"], json!("Morning Hymn"));
    assert_eq!(row["author"], json!("Parish Choir"));
    assert_eq!(row["description"], json!("Recorded live"));
    assert_eq!(row["duration"], json!(245));
    assert_eq!(row["audio_url"], json!("https://cdn.test/audio/1.mp3"));
    assert!(row["created_at"].is_string());
}

#[tokio::test]
async fn test_types_are_listed_separately_newest_first() {
    let app = setup_test_app();
    let client = app.client();

    for title in ["First clip", "Second clip"] {
        client
            .post(&api_path("/content"))
            .json(&json!({
                "contentType": "video",
                "title": title,
                "videoUrl": "https://cdn.test/video/v.mp4",
                "thumbnailUrl": "https://cdn.test/video/v.jpg"
            }))
            .await;
    }
    client
        .post(&api_path("/content"))
        .json(&json!({ "contentType": "audio", "title": "Only audio" }))
        .await;

    let videos = client
        .get(&api_path("/content"))
        .add_query_param("type", "video")
        .await
        .json::<Value>();
    let titles: Vec<&str> = videos
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Second clip", "First clip"]);
    assert_eq!(videos[0]["thumbnail_url"], json!("https://cdn.test/video/v.jpg"));
    assert!(videos[0].get("author").is_none());

    let audio = client.get(&api_path("/content")).await.json::<Value>();
    assert_eq!(audio.as_array().unwrap().len(), 1);
    assert_eq!(audio[0]["title"], json!("Only audio"));
}

#[tokio::test]
async fn test_create_accepts_body_without_json_content_type() {
    let app = setup_test_app();
    let client = app.client();

    let response = client
        .post(&api_path("/content"))
        .bytes(Bytes::from_static(
            br#"{"contentType":"video","title":"Plain body"}"#,
        ))
        .await;

    assert_eq!(response.status_code(), 201);
}

#[tokio::test]
async fn test_create_with_unknown_content_type_is_rejected() {
    let app = setup_test_app();
    let client = app.client();

    let response = client
        .post(&api_path("/content"))
        .json(&json!({ "contentType": "podcast", "title": "x" }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Invalid content type: podcast");

    let response = client
        .post(&api_path("/content"))
        .json(&json!({ "title": "x" }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Missing contentType");

    let listed = client
        .get(&api_path("/content"))
        .add_query_param("type", "video")
        .await
        .json::<Value>();
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_create_with_malformed_json_is_500() {
    let app = setup_test_app();
    let client = app.client();

    let response = client
        .post(&api_path("/content"))
        .bytes(Bytes::from_static(b"{\"contentType\": \"audio\""))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_cors(&response);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
}

#[tokio::test]
async fn test_list_with_unknown_type_is_rejected() {
    let app = setup_test_app();

    let response = app
        .client()
        .get(&api_path("/content"))
        .add_query_param("type", "image")
        .await;

    assert_error(&response, StatusCode::BAD_REQUEST, "Invalid content type: image");
}

#[tokio::test]
async fn test_delete_removes_only_that_row() {
    let app = setup_test_app();
    let client = app.client();

    let mut ids = Vec::new();
    for title in ["keep", "remove"] {
        let created = client
            .post(&api_path("/content"))
            .json(&json!({ "contentType": "audio", "title": title }))
            .await
            .json::<Value>();
        ids.push(created["id"].as_i64().unwrap());
    }

    let response = client
        .delete(&api_path("/content"))
        .add_query_param("id", ids[1])
        .add_query_param("type", "audio")
        .await;
    assert_eq!(response.status_code(), 200);
    assert_cors(&response);
    assert_eq!(response.json::<Value>(), json!({ "success": true }));

    let rows = client.get(&api_path("/content")).await.json::<Value>();
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["id"], json!(ids[0]));
}

#[tokio::test]
async fn test_delete_unknown_id_still_succeeds() {
    let app = setup_test_app();

    let response = app
        .client()
        .delete(&api_path("/content"))
        .add_query_param("id", 9999)
        .add_query_param("type", "video")
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>(), json!({ "success": true }));
}

#[tokio::test]
async fn test_delete_requires_id() {
    let app = setup_test_app();
    let client = app.client();

    let response = client.delete(&api_path("/content")).await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Missing id parameter");

    let response = client
        .delete(&api_path("/content"))
        .add_query_param("type", "video")
        .add_query_param("id", "")
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Missing id parameter");

    let response = client
        .delete(&api_path("/content"))
        .add_query_param("id", "abc")
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Invalid id parameter");
}

#[tokio::test]
async fn test_delete_removes_stored_files() {
    let app = setup_test_app();
    let client = app.client();

    let upload = client
        .post(&api_path("/upload"))
        .json(&json!({
            "file": "AAECAw==",
            "fileName": "clip.mp4",
            "fileType": "video/mp4",
            "contentType": "video"
        }))
        .await
        .json::<Value>();
    let video_url = upload["url"].as_str().unwrap().to_string();
    assert_eq!(app.stored_keys("video").await.len(), 1);

    let created = client
        .post(&api_path("/content"))
        .json(&json!({
            "contentType": "video",
            "title": "Uploaded clip",
            "videoUrl": video_url,
            "thumbnailUrl": "https://img.example.org/thumb.jpg"
        }))
        .await
        .json::<Value>();

    let response = client
        .delete(&api_path("/content"))
        .add_query_param("type", "video")
        .add_query_param("id", created["id"].as_i64().unwrap())
        .await;

    assert_eq!(response.status_code(), 200);
    assert!(app.stored_keys("video").await.is_empty());
}

#[tokio::test]
async fn test_delete_keeps_files_when_cleanup_disabled() {
    let app = setup_test_app_with(
        Arc::new(helpers::InMemoryContentRepository::default()),
        false,
    );
    let client = app.client();

    let upload = client
        .post(&api_path("/upload"))
        .json(&json!({
            "file": "SUQz",
            "fileName": "song.mp3",
            "fileType": "audio/mpeg",
            "contentType": "audio"
        }))
        .await
        .json::<Value>();

    let created = client
        .post(&api_path("/content"))
        .json(&json!({ "contentType": "audio", "audioUrl": upload["url"] }))
        .await
        .json::<Value>();

    client
        .delete(&api_path("/content"))
        .add_query_param("id", created["id"].as_i64().unwrap())
        .await;

    assert_eq!(app.stored_keys("audio").await.len(), 1);
}

#[tokio::test]
async fn test_options_is_an_empty_preflight() {
    let app = setup_test_app();

    let response = app
        .client()
        .method(Method::OPTIONS, &api_path("/content"))
        .add_header("Origin", "https://admin.example.org")
        .add_header("Access-Control-Request-Method", "DELETE")
        .await;

    assert_eq!(response.status_code(), 200);
    assert_cors(&response);
    assert!(response.text().is_empty());
    assert!(response.headers().get(header::CONTENT_TYPE).is_none());

    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    for method in ["GET", "POST", "DELETE", "OPTIONS"] {
        assert!(allowed.contains(method), "missing {} in {}", method, allowed);
    }
}

#[tokio::test]
async fn test_bare_options_without_preflight_headers() {
    let app = setup_test_app();

    let response = app
        .client()
        .method(Method::OPTIONS, &api_path("/content"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_cors(&response);
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn test_unsupported_method_is_405() {
    let app = setup_test_app();

    let response = app.client().put(&api_path("/content")).await;
    assert_error(&response, StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");

    let response = app.client().patch(&api_path("/content")).await;
    assert_error(&response, StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
}

#[tokio::test]
async fn test_head_is_405_not_a_listing() {
    let app = setup_test_app();

    let response = app
        .client()
        .method(Method::HEAD, &api_path("/content"))
        .await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_cors(&response);
}

#[tokio::test]
async fn test_database_failure_is_500_with_message() {
    let app = setup_test_app_with(Arc::new(FailingContentRepository), true);
    let client = app.client();

    let response = client.get(&api_path("/content")).await;
    assert_error(&response, StatusCode::INTERNAL_SERVER_ERROR, "connection refused");

    let response = client
        .post(&api_path("/content"))
        .json(&json!({ "contentType": "audio" }))
        .await;
    assert_error(&response, StatusCode::INTERNAL_SERVER_ERROR, "connection refused");

    let response = client
        .delete(&api_path("/content"))
        .add_query_param("id", 1)
        .await;
    assert_error(&response, StatusCode::INTERNAL_SERVER_ERROR, "connection refused");
}

#[tokio::test]
async fn test_readiness_reflects_dependencies() {
    let app = setup_test_app();
    let response = app.client().get("/health/ready").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], json!("ready"));

    let app = setup_test_app_with(Arc::new(FailingContentRepository), true);
    let response = app.client().get("/health/ready").await;
    assert_eq!(response.status_code(), 503);
    let body = response.json::<Value>();
    assert_eq!(body["status"], json!("not_ready"));
    assert!(body["database"]
        .as_str()
        .is_some_and(|status| status.starts_with("not_ready")));
    assert_eq!(body["storage"], json!("ready"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app();

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let spec = response.json::<Value>();
    assert!(spec["paths"].get("/api/v0/content").is_some());
}
