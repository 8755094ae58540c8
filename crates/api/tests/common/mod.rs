//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tutor_api::auth::jwt::{generate_access_token, JwtConfig};
use tutor_api::config::ServerConfig;
use tutor_api::router::build_app_router;
use tutor_api::state::AppState;
use tutor_core::grading::ThresholdScale;
use tutor_core::roles::{ROLE_GUEST, ROLE_STUDENT, ROLE_TEACHER};
use tutor_db::models::user::{CreateUser, User};
use tutor_db::repositories::UserRepo;

/// Bot token used to sign Telegram login payloads in tests.
pub const TEST_BOT_TOKEN: &str = "123456:test-bot-token";

/// Telegram id on the teacher allow-list.
pub const TEACHER_TELEGRAM_ID: i64 = 777_000;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: test_jwt_config(),
        teacher_telegram_ids: vec![TEACHER_TELEGRAM_ID],
        telegram_bot_token: Some(TEST_BOT_TOKEN.to_string()),
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
        access_token_expiry_mins: 60,
    }
}

/// Build the full application router, middleware included, over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = Arc::new(test_config());
    let state = AppState::new(
        pool,
        Arc::clone(&config),
        Arc::new(ThresholdScale::five_point()),
    );
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, telegram_id: Option<i64>, role: &str, name: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            telegram_id,
            username: Some(name.to_lowercase()),
            first_name: name.to_string(),
            last_name: "Test".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn create_teacher(pool: &PgPool) -> User {
    create_user(pool, Some(TEACHER_TELEGRAM_ID), ROLE_TEACHER, "Teacher").await
}

/// Students have no Telegram id, so their notifications go in-app.
pub async fn create_student(pool: &PgPool, name: &str) -> User {
    create_user(pool, None, ROLE_STUDENT, name).await
}

pub async fn create_guest(pool: &PgPool, telegram_id: i64) -> User {
    create_user(pool, Some(telegram_id), ROLE_GUEST, "Guest").await
}

/// Mint an access token for `user` without going through login.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_jwt_config()).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
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
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(json)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    json: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(json)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    json: serde_json::Value,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(json)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
