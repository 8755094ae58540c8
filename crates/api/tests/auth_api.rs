//! Integration tests for Telegram login, the current-user endpoint and
//! invite codes.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::*;
use serde_json::json;
use sqlx::PgPool;
use tutor_api::auth::telegram::{sign, TelegramLogin};

/// A login-widget payload signed with the test bot token.
fn signed_login(telegram_id: i64, first_name: &str) -> serde_json::Value {
    let mut login = TelegramLogin {
        id: telegram_id,
        first_name: Some(first_name.to_string()),
        last_name: None,
        username: Some(first_name.to_lowercase()),
        photo_url: None,
        auth_date: Utc::now().timestamp(),
        hash: String::new(),
    };
    login.hash = sign(TEST_BOT_TOKEN, &login.data_check_string());
    json!({
        "id": login.id,
        "first_name": login.first_name,
        "username": login.username,
        "auth_date": login.auth_date,
        "hash": login.hash,
    })
}

// ---------------------------------------------------------------------------
// Telegram login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_login_registers_a_guest(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/auth/telegram", signed_login(4242, "Ann")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["is_new_user"], true);
    assert_eq!(json["user"]["role"], "guest");
    assert_eq!(json["user"]["telegram_id"], 4242);
    let token = json["access_token"].as_str().unwrap().to_string();

    // The token works and a second login finds the same account.
    let app = build_test_app(pool.clone());
    let me = body_json(get_auth(app, "/api/v1/auth/me", &token).await).await;
    assert_eq!(me["data"]["first_name"], "Ann");

    let app = build_test_app(pool);
    let again = body_json(post_json(app, "/api/v1/auth/telegram", signed_login(4242, "Anna")).await)
        .await;
    assert_eq!(again["is_new_user"], false);
    assert_eq!(again["user"]["id"], me["data"]["id"]);
    assert_eq!(again["user"]["first_name"], "Anna");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn allow_listed_telegram_id_becomes_teacher(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/telegram",
        signed_login(TEACHER_TELEGRAM_ID, "Maria"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["role"], "teacher");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tampered_login_payload_is_rejected(pool: PgPool) {
    let mut payload = signed_login(4242, "Ann");
    payload["first_name"] = json!("Mallory");

    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/auth/telegram", payload).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Invite codes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn guest_redeems_invite_and_becomes_student(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let guest = create_guest(&pool, 5001).await;
    let other_guest = create_guest(&pool, 5002).await;

    let app = build_test_app(pool.clone());
    let response = post_auth(app, "/api/v1/auth/invites", &token_for(&teacher)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let code = body_json(response).await["data"]["code"]
        .as_str()
        .unwrap()
        .to_string();

    // Codes are case-insensitive on input.
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/auth/invite/redeem",
        &token_for(&guest),
        json!({ "code": code.to_lowercase(), "phone": "+100200300", "grade": 7 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["role"], "student");
    assert_eq!(json["user"]["grade"], 7);
    assert_eq!(json["user"]["invite_code"], code.as_str());

    // The fresh token carries the student role.
    let student_token = json["access_token"].as_str().unwrap().to_string();
    let app = build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/targets", &student_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Single use.
    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/auth/invite/redeem",
        &token_for(&other_guest),
        json!({ "code": code }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_invite_code_returns_404(pool: PgPool) {
    let guest = create_guest(&pool, 5001).await;

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/auth/invite/redeem",
        &token_for(&guest),
        json!({ "code": "ABCD2345" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_guests_can_redeem(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let student = create_student(&pool, "Ann").await;

    let app = build_test_app(pool.clone());
    let code = body_json(post_auth(app, "/api/v1/auth/invites", &token_for(&teacher)).await).await
        ["data"]["code"]
        .as_str()
        .unwrap()
        .to_string();

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/auth/invite/redeem",
        &token_for(&student),
        json!({ "code": code }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_STATE");

    // The failed attempt did not consume the code.
    let app = build_test_app(pool);
    let invites = body_json(get_auth(app, "/api/v1/auth/invites", &token_for(&teacher)).await).await;
    assert!(invites["data"][0]["redeemed_by"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn students_cannot_issue_invites(pool: PgPool) {
    let student = create_student(&pool, "Ann").await;

    let app = build_test_app(pool);
    let response = post_auth(app, "/api/v1/auth/invites", &token_for(&student)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
