//! Periodically drains the notification queue.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tutor_events::NotificationDispatcher;

/// Run dispatch passes until `cancel` is triggered.
pub async fn run(dispatcher: NotificationDispatcher, every: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = every.as_secs(), "Notification dispatch started");

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Notification dispatch stopping");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = dispatcher.dispatch_pending().await {
                    tracing::error!(error = %e, "Notification dispatch pass failed");
                }
            }
        }
    }
}
