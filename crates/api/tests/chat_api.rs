//! Integration tests for chat threads and messages.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::*;
use serde_json::json;
use sqlx::PgPool;
use tutor_db::models::user::User;

async fn open_direct(pool: &PgPool, caller: &User, peer: &User) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/chat/direct",
        &token_for(caller),
        json!({ "peer_id": peer.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn send(pool: &PgPool, author: &User, thread_id: i64, text: &str) -> serde_json::Value {
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/chat/threads/{thread_id}/messages"),
        &token_for(author),
        json!({ "text": text }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn direct_thread_is_shared_by_both_sides(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let ann = create_student(&pool, "Ann").await;

    let from_teacher = open_direct(&pool, &teacher, &ann).await;
    let from_student = open_direct(&pool, &ann, &teacher).await;
    assert_eq!(from_teacher, from_student);

    // Two students cannot open a direct thread.
    let bob = create_student(&pool, "Bob").await;
    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/chat/direct",
        &token_for(&ann),
        json!({ "peer_id": bob.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn messages_notify_and_track_unread(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let ann = create_student(&pool, "Ann").await;
    let thread = open_direct(&pool, &teacher, &ann).await;

    send(&pool, &teacher, thread, "Hello Ann").await;
    send(&pool, &teacher, thread, "Did you see the new task?").await;

    let app = build_test_app(pool.clone());
    let unread = body_json(
        get_auth(
            app,
            &format!("/api/v1/chat/threads/{thread}/unread-count"),
            &token_for(&ann),
        )
        .await,
    )
    .await;
    assert_eq!(unread["data"]["count"], 2);

    let app = build_test_app(pool.clone());
    let inbox = body_json(get_auth(app, "/api/v1/notifications", &token_for(&ann)).await).await;
    assert!(inbox["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|n| n["notification_type"] == "new_message"));
    assert_eq!(inbox["data"].as_array().unwrap().len(), 2);

    // Replying reads the thread for the sender.
    send(&pool, &ann, thread, "Yes").await;
    let app = build_test_app(pool.clone());
    let threads = body_json(get_auth(app, "/api/v1/chat/threads", &token_for(&ann)).await).await;
    assert_eq!(threads["data"][0]["id"], thread);
    assert_eq!(threads["data"][0]["unread_count"], 0);

    let app = build_test_app(pool);
    let messages = body_json(
        get_auth(
            app,
            &format!("/api/v1/chat/threads/{thread}/messages?limit=2"),
            &token_for(&teacher),
        )
        .await,
    )
    .await;
    let messages = messages["data"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["text"], "Yes");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn outsiders_cannot_read_a_thread(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let ann = create_student(&pool, "Ann").await;
    let eve = create_student(&pool, "Eve").await;
    let thread = open_direct(&pool, &teacher, &ann).await;

    let app = build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/chat/threads/{thread}/messages"),
        &token_for(&eve),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_the_author_edits_or_deletes(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let ann = create_student(&pool, "Ann").await;
    let thread = open_direct(&pool, &teacher, &ann).await;
    let message = send(&pool, &ann, thread, "typo").await;
    let message_id = message["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/chat/messages/{message_id}"),
        &token_for(&teacher),
        json!({ "text": "hijack" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/chat/messages/{message_id}"),
        &token_for(&ann),
        json!({ "text": "fixed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["text"], "fixed");

    let app = build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/chat/messages/{message_id}"),
        &token_for(&ann),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = build_test_app(pool);
    let messages = body_json(
        get_auth(
            app,
            &format!("/api/v1/chat/threads/{thread}/messages"),
            &token_for(&teacher),
        )
        .await,
    )
    .await;
    assert!(messages["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn grading_posts_a_marker_in_the_direct_thread(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let ann = create_student(&pool, "Ann").await;

    let app = build_test_app(pool.clone());
    let data = body_json(
        post_json_auth(
            app,
            "/api/v1/assignments",
            &token_for(&teacher),
            json!({
                "title": "Essay",
                "student_id": ann.id,
                "due_date": (Utc::now() + Duration::days(1)).to_rfc3339(),
            }),
        )
        .await,
    )
    .await;
    let target = data["data"]["targets"][0]["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/v1/targets/{target}/submit"),
        &token_for(&ann),
        json!({ "text": "done" }),
    )
    .await;
    let app = build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/v1/targets/{target}/grade"),
        &token_for(&teacher),
        json!({ "score": 3.0 }),
    )
    .await;

    let thread = open_direct(&pool, &ann, &teacher).await;
    let app = build_test_app(pool);
    let messages = body_json(
        get_auth(
            app,
            &format!("/api/v1/chat/threads/{thread}/messages"),
            &token_for(&ann),
        )
        .await,
    )
    .await;
    assert_eq!(messages["data"][0]["kind"], "grade");
    assert_eq!(messages["data"][0]["text"], "\"Essay\" graded: 3");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn guests_cannot_chat(pool: PgPool) {
    let guest = create_guest(&pool, 5001).await;

    let app = build_test_app(pool);
    let response = get_auth(app, "/api/v1/chat/threads", &token_for(&guest)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
