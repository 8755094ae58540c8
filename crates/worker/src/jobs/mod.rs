//! Scheduled jobs.
//!
//! Each job exposes a `run_once` that performs a single pass (what the
//! tests drive) and a `run` loop intended to be spawned
//! via `tokio::spawn`. All loops accept a [`CancellationToken`] for
//! graceful shutdown.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod deadline_reminders;
pub mod notification_dispatch;
pub mod notification_retention;
pub mod overdue_sweep;
