//! Drains the pending notification queue.

use tutor_core::notifications::MAX_DELIVERY_ATTEMPTS;
use tutor_db::repositories::NotificationRepo;
use tutor_db::DbPool;

use crate::delivery::{ChannelRegistry, DeliveryError};

/// Default number of rows fetched per pass.
pub const DEFAULT_BATCH_SIZE: i64 = 100;

/// Counts from one dispatch pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
}

/// Delivers pending notifications oldest first through their channel.
///
/// A successful delivery moves the row to `sent`. A failure bumps
/// `attempts` and records `last_error`; the row is retried on later passes
/// until it reaches [`MAX_DELIVERY_ATTEMPTS`].
pub struct NotificationDispatcher {
    pool: DbPool,
    channels: ChannelRegistry,
    batch_size: i64,
}

impl NotificationDispatcher {
    pub fn new(pool: DbPool, channels: ChannelRegistry) -> Self {
        Self {
            pool,
            channels,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Run one pass over at most `batch_size` pending rows.
    pub async fn dispatch_pending(&self) -> Result<DispatchReport, sqlx::Error> {
        let batch =
            NotificationRepo::list_pending(&self.pool, MAX_DELIVERY_ATTEMPTS, self.batch_size)
                .await?;
        let mut report = DispatchReport::default();

        for notification in batch {
            let result = match self.channels.get(&notification.channel) {
                Some(channel) => channel.deliver(&notification).await,
                None => Err(DeliveryError::UnknownChannel(notification.channel.clone())),
            };

            match result {
                Ok(()) => {
                    NotificationRepo::mark_sent(&self.pool, notification.id).await?;
                    report.sent += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        notification_id = notification.id,
                        channel = %notification.channel,
                        attempt = notification.attempts + 1,
                        error = %e,
                        "Notification delivery failed"
                    );
                    NotificationRepo::record_failure(&self.pool, notification.id, &e.to_string())
                        .await?;
                    report.failed += 1;
                }
            }
        }

        if report.sent + report.failed > 0 {
            tracing::info!(sent = report.sent, failed = report.failed, "Dispatch pass complete");
        }
        Ok(report)
    }
}
