//! Notification entity models and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tutor_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub notification_type: String,
    pub channel: String,
    pub status: String,
    pub title: String,
    pub message: String,
    pub payload: serde_json::Value,
    pub attempts: i32,
    pub sent_at: Option<Timestamp>,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Input for queueing a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: DbId,
    pub notification_type: String,
    pub channel: String,
    pub title: String,
    pub message: String,
    pub payload: serde_json::Value,
}

/// A pending notification joined with what the delivery layer needs to
/// reach the recipient.
#[derive(Debug, Clone, FromRow)]
pub struct PendingDelivery {
    pub id: DbId,
    pub user_id: DbId,
    pub channel: String,
    pub title: String,
    pub message: String,
    pub attempts: i32,
    pub telegram_id: Option<i64>,
}
