//! Repository for the `notifications` table.
//!
//! The table doubles as the outbound queue: rows start `pending`, the
//! dispatch pass moves them to `sent`, and users move them to `read`.

use sqlx::PgPool;
use tutor_core::notifications::{
    NOTIFICATION_STATUS_PENDING, NOTIFICATION_STATUS_READ, NOTIFICATION_STATUS_SENT,
};
use tutor_core::types::{DbId, Timestamp};

use crate::models::notification::{NewNotification, Notification, PendingDelivery};

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, user_id, notification_type, channel, status, title, message, \
     payload, attempts, sent_at, read_at, created_at";

/// Provides the notification queue and inbox.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Enqueue a single notification.
    pub async fn create(
        pool: &PgPool,
        input: &NewNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications
                (user_id, notification_type, channel, status, title, message, payload)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.user_id)
            .bind(&input.notification_type)
            .bind(&input.channel)
            .bind(NOTIFICATION_STATUS_PENDING)
            .bind(&input.title)
            .bind(&input.message)
            .bind(&input.payload)
            .fetch_one(pool)
            .await
    }

    /// Enqueue many notifications with one `UNNEST` insert. Returns the
    /// number of rows written.
    pub async fn create_batch(
        pool: &PgPool,
        inputs: &[NewNotification],
    ) -> Result<u64, sqlx::Error> {
        if inputs.is_empty() {
            return Ok(0);
        }
        let user_ids: Vec<DbId> = inputs.iter().map(|n| n.user_id).collect();
        let types: Vec<&str> = inputs.iter().map(|n| n.notification_type.as_str()).collect();
        let channels: Vec<&str> = inputs.iter().map(|n| n.channel.as_str()).collect();
        let titles: Vec<&str> = inputs.iter().map(|n| n.title.as_str()).collect();
        let messages: Vec<&str> = inputs.iter().map(|n| n.message.as_str()).collect();
        let payloads: Vec<serde_json::Value> = inputs.iter().map(|n| n.payload.clone()).collect();

        let result = sqlx::query(
            "INSERT INTO notifications
                (user_id, notification_type, channel, status, title, message, payload)
             SELECT u, t, c, $7, ti, m, p
             FROM UNNEST($1::bigint[], $2::text[], $3::text[], $4::text[], $5::text[], $6::jsonb[])
                  AS x(u, t, c, ti, m, p)",
        )
        .bind(&user_ids)
        .bind(&types)
        .bind(&channels)
        .bind(&titles)
        .bind(&messages)
        .bind(&payloads)
        .bind(NOTIFICATION_STATUS_PENDING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List notifications for a user, newest first.
    ///
    /// When `unread_only` is `true`, only rows without `read_at` are
    /// returned.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND read_at IS NULL"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 {filter} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if the notification was found for the given user and
    /// updated, `false` otherwise.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET status = $3, read_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND read_at IS NULL",
        )
        .bind(notification_id)
        .bind(user_id)
        .bind(NOTIFICATION_STATUS_READ)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all of a user's notifications as read. Returns the count updated.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET status = $2, read_at = NOW() \
             WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .bind(NOTIFICATION_STATUS_READ)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count unread notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Delivery queue
    // -----------------------------------------------------------------------

    /// Oldest pending notifications still under the attempt limit, joined
    /// with the recipient's Telegram id.
    pub async fn list_pending(
        pool: &PgPool,
        max_attempts: i32,
        limit: i64,
    ) -> Result<Vec<PendingDelivery>, sqlx::Error> {
        sqlx::query_as::<_, PendingDelivery>(
            "SELECT n.id, n.user_id, n.channel, n.title, n.message, n.attempts, u.telegram_id
             FROM notifications n
             JOIN users u ON u.id = n.user_id
             WHERE n.status = $1 AND n.attempts < $2
             ORDER BY n.created_at, n.id
             LIMIT $3",
        )
        .bind(NOTIFICATION_STATUS_PENDING)
        .bind(max_attempts)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Pending rows split into those still retryable and those that used up
    /// `max_attempts`.
    pub async fn backlog(pool: &PgPool, max_attempts: i32) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE attempts < $2),
                    COUNT(*) FILTER (WHERE attempts >= $2)
             FROM notifications
             WHERE status = $1",
        )
        .bind(NOTIFICATION_STATUS_PENDING)
        .bind(max_attempts)
        .fetch_one(pool)
        .await
    }

    /// Record a successful delivery. Returns `false` if the row was no
    /// longer pending.
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET status = $2, sent_at = NOW(), attempts = attempts + 1, last_error = NULL \
             WHERE id = $1 AND status = $3",
        )
        .bind(id)
        .bind(NOTIFICATION_STATUS_SENT)
        .bind(NOTIFICATION_STATUS_PENDING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a failed delivery attempt; the row stays pending.
    pub async fn record_failure(pool: &PgPool, id: DbId, error: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notifications \
             SET attempts = attempts + 1, last_error = $2 \
             WHERE id = $1 AND status = $3",
        )
        .bind(id)
        .bind(error)
        .bind(NOTIFICATION_STATUS_PENDING)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Last recorded delivery error for a notification.
    pub async fn last_error(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<String>>("SELECT last_error FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map(Option::flatten)
    }

    /// Delete delivered or read notifications created before `cutoff`.
    /// Pending rows are never purged.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM notifications \
             WHERE status IN ($2, $3) AND created_at < $1",
        )
        .bind(cutoff)
        .bind(NOTIFICATION_STATUS_SENT)
        .bind(NOTIFICATION_STATUS_READ)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
