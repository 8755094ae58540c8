//! Periodic cleanup of delivered and read notifications.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tutor_core::types::Timestamp;
use tutor_db::repositories::NotificationRepo;

/// Delete sent or read notifications older than `retention_days` before
/// `now`. Returns the number of rows removed.
pub async fn run_once(
    pool: &PgPool,
    now: Timestamp,
    retention_days: i64,
) -> Result<u64, sqlx::Error> {
    let cutoff = now - chrono::Duration::days(retention_days);
    NotificationRepo::delete_older_than(pool, cutoff).await
}

/// Run the retention cleanup loop until `cancel` is triggered.
pub async fn run(pool: PgPool, every: Duration, retention_days: i64, cancel: CancellationToken) {
    tracing::info!(
        retention_days,
        interval_secs = every.as_secs(),
        "Notification retention job started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Notification retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match run_once(&pool, Utc::now(), retention_days).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Notification retention: purged old rows");
                    }
                    Ok(_) => tracing::debug!("Notification retention: no rows to purge"),
                    Err(e) => tracing::error!(error = %e, "Notification retention: cleanup failed"),
                }
            }
        }
    }
}
