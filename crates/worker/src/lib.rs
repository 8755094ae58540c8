//! Scheduled background work: the overdue sweep, deadline reminders,
//! notification dispatch and notification retention.

pub mod config;
pub mod jobs;

pub use config::WorkerConfig;
