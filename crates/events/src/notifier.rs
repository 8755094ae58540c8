//! Best-effort notification enqueueing.
//!
//! Domain operations call [`Notifier`] after their own transaction has
//! committed. A failure here is logged and swallowed: the state change that
//! triggered the notification has already happened and must not be undone.

use std::collections::HashMap;

use tutor_core::channels::preferred_channel;
use tutor_core::notifications::NotificationContent;
use tutor_core::types::DbId;
use tutor_db::models::notification::NewNotification;
use tutor_db::repositories::{NotificationRepo, UserRepo};
use tutor_db::DbPool;

/// One notification addressed to one user.
#[derive(Debug, Clone)]
pub struct Outgoing {
    pub user_id: DbId,
    pub content: NotificationContent,
    pub payload: serde_json::Value,
}

impl Outgoing {
    pub fn new(user_id: DbId, content: NotificationContent, payload: serde_json::Value) -> Self {
        Self {
            user_id,
            content,
            payload,
        }
    }
}

/// Writes `pending` notification rows for the dispatcher to deliver.
#[derive(Clone)]
pub struct Notifier {
    pool: DbPool,
}

impl Notifier {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Enqueue one notification. Errors are logged, never returned.
    pub async fn notify(
        &self,
        user_id: DbId,
        content: NotificationContent,
        payload: serde_json::Value,
    ) {
        self.notify_all(vec![Outgoing::new(user_id, content, payload)])
            .await;
    }

    /// Enqueue the same notification for several users.
    pub async fn notify_many(
        &self,
        user_ids: &[DbId],
        content: &NotificationContent,
        payload: &serde_json::Value,
    ) {
        let items = user_ids
            .iter()
            .map(|id| Outgoing::new(*id, content.clone(), payload.clone()))
            .collect();
        self.notify_all(items).await;
    }

    /// Enqueue a batch of individually addressed notifications.
    pub async fn notify_all(&self, items: Vec<Outgoing>) {
        let count = items.len();
        if let Err(e) = self.enqueue(items).await {
            tracing::error!(error = %e, count, "Failed to enqueue notifications");
        }
    }

    /// Fallible core of the `notify_*` helpers. Each recipient gets the bot
    /// channel when they have a Telegram id and in-app otherwise. Recipients
    /// that no longer exist are skipped.
    pub async fn enqueue(&self, items: Vec<Outgoing>) -> Result<u64, sqlx::Error> {
        if items.is_empty() {
            return Ok(0);
        }

        let mut ids: Vec<DbId> = items.iter().map(|o| o.user_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let channels: HashMap<DbId, &'static str> = UserRepo::find_many(&self.pool, &ids)
            .await?
            .into_iter()
            .map(|u| (u.id, preferred_channel(u.telegram_id)))
            .collect();

        let rows: Vec<NewNotification> = items
            .into_iter()
            .filter_map(|o| {
                let Some(channel) = channels.get(&o.user_id) else {
                    tracing::warn!(user_id = o.user_id, "Skipping notification for unknown user");
                    return None;
                };
                Some(NewNotification {
                    user_id: o.user_id,
                    notification_type: o.content.notification_type.to_string(),
                    channel: channel.to_string(),
                    title: o.content.title,
                    message: o.content.message,
                    payload: o.payload,
                })
            })
            .collect();

        let written = NotificationRepo::create_batch(&self.pool, &rows).await?;
        tracing::debug!(written, "Notifications enqueued");
        Ok(written)
    }
}
