//! Integration tests for the `/notifications` inbox.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use sqlx::PgPool;
use tutor_core::notifications;
use tutor_events::Notifier;

async fn seed(pool: &PgPool, user_id: i64, count: usize) {
    let notifier = Notifier::new(pool.clone());
    for i in 0..count {
        notifier
            .notify(
                user_id,
                notifications::group_invite(&format!("Group {i}")),
                json!({ "group_id": i }),
            )
            .await;
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inbox_lists_and_marks_read(pool: PgPool) {
    let ann = create_student(&pool, "Ann").await;
    seed(&pool, ann.id, 3).await;
    let token = token_for(&ann);

    let app = build_test_app(pool.clone());
    let list = body_json(get_auth(app, "/api/v1/notifications", &token).await).await;
    let items = list["data"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["channel"], "in_app");

    let app = build_test_app(pool.clone());
    let count = body_json(get_auth(app, "/api/v1/notifications/unread-count", &token).await).await;
    assert_eq!(count["data"]["count"], 3);

    let first_id = items[0]["id"].as_i64().unwrap();
    let app = build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/v1/notifications/{first_id}/read"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Already read.
    let app = build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/v1/notifications/{first_id}/read"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = build_test_app(pool.clone());
    let unread = body_json(
        get_auth(app, "/api/v1/notifications?unread_only=true", &token).await,
    )
    .await;
    assert_eq!(unread["data"].as_array().unwrap().len(), 2);

    let app = build_test_app(pool.clone());
    let marked = body_json(post_auth(app, "/api/v1/notifications/read-all", &token).await).await;
    assert_eq!(marked["data"]["marked_read"], 2);

    let app = build_test_app(pool);
    let count = body_json(get_auth(app, "/api/v1/notifications/unread-count", &token).await).await;
    assert_eq!(count["data"]["count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_cannot_read_each_others_notifications(pool: PgPool) {
    let ann = create_student(&pool, "Ann").await;
    let bob = create_student(&pool, "Bob").await;
    seed(&pool, ann.id, 1).await;

    let app = build_test_app(pool.clone());
    let list = body_json(get_auth(app, "/api/v1/notifications", &token_for(&ann)).await).await;
    let id = list["data"][0]["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/v1/notifications/{id}/read"), &token_for(&bob)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = build_test_app(pool);
    let list = body_json(get_auth(app, "/api/v1/notifications", &token_for(&bob)).await).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn page_size_is_capped(pool: PgPool) {
    let ann = create_student(&pool, "Ann").await;
    seed(&pool, ann.id, 3).await;

    let app = build_test_app(pool);
    let list = body_json(
        get_auth(app, "/api/v1/notifications?limit=2&offset=1", &token_for(&ann)).await,
    )
    .await;
    assert_eq!(list["data"].as_array().unwrap().len(), 2);
}
