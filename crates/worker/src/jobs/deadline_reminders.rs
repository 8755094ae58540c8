//! Reminds students of assignments due soon.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tutor_core::notifications;
use tutor_core::types::Timestamp;
use tutor_db::repositories::AssignmentTargetRepo;
use tutor_events::{Notifier, Outgoing};

/// Claim and notify every pending target due within `window` of `now`.
/// Returns the number of reminders enqueued.
pub async fn run_once(
    pool: &PgPool,
    notifier: &Notifier,
    now: Timestamp,
    window: chrono::Duration,
) -> Result<usize, sqlx::Error> {
    let claimed = AssignmentTargetRepo::claim_reminders(pool, now, now + window).await?;
    let count = claimed.len();

    let outgoing = claimed
        .into_iter()
        .map(|t| {
            Outgoing::new(
                t.student_id,
                notifications::deadline_reminder(&t.title, t.due_date),
                serde_json::json!({
                    "assignment_id": t.assignment_id,
                    "target_id": t.target_id,
                }),
            )
        })
        .collect();
    notifier.notify_all(outgoing).await;

    Ok(count)
}

/// Run the reminder loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    notifier: Notifier,
    every: Duration,
    window: chrono::Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = every.as_secs(),
        window_hours = window.num_hours(),
        "Deadline reminders started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Deadline reminders stopping");
                break;
            }
            _ = interval.tick() => {
                match run_once(&pool, &notifier, Utc::now(), window).await {
                    Ok(0) => tracing::debug!("Deadline reminders: nothing due"),
                    Ok(count) => tracing::info!(count, "Deadline reminders enqueued"),
                    Err(e) => tracing::error!(error = %e, "Deadline reminders failed"),
                }
            }
        }
    }
}
