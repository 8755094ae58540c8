//! Flips pending targets past their due date to `overdue`.
//!
//! The flip is one conditional `UPDATE ... RETURNING`, so only rows that
//! actually changed are reported and notified. Running the sweep twice, or
//! alongside a submission, never notifies a target twice.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tutor_core::notifications;
use tutor_core::types::Timestamp;
use tutor_db::models::assignment_target::DueTarget;
use tutor_db::repositories::AssignmentTargetRepo;
use tutor_events::{Notifier, Outgoing};

/// Run one sweep at `now`. Returns the targets that became overdue.
pub async fn run_once(
    pool: &PgPool,
    notifier: &Notifier,
    now: Timestamp,
) -> Result<Vec<DueTarget>, sqlx::Error> {
    let flipped = AssignmentTargetRepo::mark_overdue(pool, now).await?;

    let outgoing = flipped
        .iter()
        .map(|t| {
            Outgoing::new(
                t.student_id,
                notifications::overdue(&t.title),
                serde_json::json!({
                    "assignment_id": t.assignment_id,
                    "target_id": t.target_id,
                }),
            )
        })
        .collect();
    notifier.notify_all(outgoing).await;

    Ok(flipped)
}

/// Run the overdue sweep loop until `cancel` is triggered.
pub async fn run(pool: PgPool, notifier: Notifier, every: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = every.as_secs(), "Overdue sweep started");

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Overdue sweep stopping");
                break;
            }
            _ = interval.tick() => {
                match run_once(&pool, &notifier, Utc::now()).await {
                    Ok(flipped) if !flipped.is_empty() => {
                        tracing::info!(count = flipped.len(), "Overdue sweep: targets marked overdue");
                    }
                    Ok(_) => tracing::debug!("Overdue sweep: nothing past due"),
                    Err(e) => tracing::error!(error = %e, "Overdue sweep failed"),
                }
            }
        }
    }
}
