#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use callsheet_api::auth::jwt::JwtConfig;
use callsheet_api::config::ServerConfig;
use callsheet_api::router::build_app_router;
use callsheet_api::state::AppState;

pub const TEST_PASSWORD: &str = "clapperboard-42";

/// Build a test `ServerConfig` with safe defaults and uploads under `upload_dir`.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 64 * 1024,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 30,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// with uploads going to the system temp directory.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_uploads(pool, &std::env::temp_dir().join("callsheet-test-uploads"))
}

pub fn build_test_app_with_uploads(pool: PgPool, upload_dir: &Path) -> Router {
    let config = test_config(upload_dir);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Register `username` through the API and return an access token.
pub async fn register_and_login(app: &Router, username: &str) -> String {
    let body = serde_json::json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": TEST_PASSWORD,
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = serde_json::json!({ "username": username, "password": TEST_PASSWORD });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create a project and a shotlist for the token's user; return the shotlist id.
pub async fn create_shotlist(app: &Router, token: &str, call_time: Option<&str>) -> i64 {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/projects",
        serde_json::json!({ "name": "Feature" }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let project_id = body_json(response).await["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/shotlists"),
        serde_json::json!({ "name": "Day 1", "call_time": call_time }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Append an item to a shotlist; return its id.
pub async fn create_item(app: &Router, token: &str, shotlist_id: i64, name: &str, duration: Option<i32>) -> i64 {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/shotlists/{shotlist_id}/items"),
        serde_json::json!({ "shot_name": name, "shot_duration": duration }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
