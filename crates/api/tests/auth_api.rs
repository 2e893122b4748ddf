//! HTTP-level integration tests for registration, login, refresh and logout.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_auth, post_json, TEST_PASSWORD};
use sqlx::PgPool;

fn register_body(username: &str) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": TEST_PASSWORD,
        "full_name": "Script Supervisor",
    })
}

async fn login(app: &axum::Router, login: &str) -> serde_json::Value {
    let body = serde_json::json!({ "username": login, "password": TEST_PASSWORD });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_returns_user_without_hash(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/auth/register", register_body("scripty")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["username"], "scripty");
    assert_eq!(json["email"], "scripty@example.com");
    assert_eq!(json["is_active"], true);
    assert!(json.get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_is_409(pool: PgPool) {
    let app = common::build_test_app(pool);
    let first = post_json(app.clone(), "/api/v1/auth/register", register_body("scripty")).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app, "/api/v1/auth/register", register_body("scripty")).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_rejects_invalid_input(pool: PgPool) {
    let app = common::build_test_app(pool);

    let mut short_password = register_body("scripty");
    short_password["password"] = "short".into();
    let response = post_json(app.clone(), "/api/v1/auth/register", short_password).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let mut bad_email = register_body("scripty");
    bad_email["email"] = "nope".into();
    let response = post_json(app, "/api/v1/auth/register", bad_email).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_by_username_or_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(app.clone(), "/api/v1/auth/register", register_body("scripty")).await;

    let by_name = login(&app, "scripty").await;
    assert!(by_name["access_token"].is_string());
    assert!(by_name["refresh_token"].is_string());
    assert_eq!(by_name["token_type"], "Bearer");
    assert_eq!(by_name["expires_in"], 30 * 60);
    assert_eq!(by_name["user"]["username"], "scripty");

    let by_email = login(&app, "scripty@example.com").await;
    assert_eq!(by_email["user"]["id"], by_name["user"]["id"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(app.clone(), "/api/v1/auth/register", register_body("scripty")).await;

    let body = serde_json::json!({ "username": "scripty", "password": "incorrect-password" });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = serde_json::json!({ "username": "nobody", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(app.clone(), "/api/v1/auth/register", register_body("scripty")).await;
    let tokens = login(&app, "scripty").await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refresh_token"], tokens["refresh_token"]);

    // The old token was revoked by the rotation.
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_and_logout(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(app.clone(), "/api/v1/auth/register", register_body("scripty")).await;
    let tokens = login(&app, "scripty").await;
    let access = tokens["access_token"].as_str().unwrap();

    let response = get_auth(app.clone(), "/api/v1/auth/me", access).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], "scripty");

    let response = post_auth(app.clone(), "/api/v1/auth/logout", access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "refresh_token": tokens["refresh_token"] });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_garbage_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
