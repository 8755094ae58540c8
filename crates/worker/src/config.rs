use std::time::Duration;

use tutor_core::notifications::DEFAULT_RETENTION_DAYS;

/// Scheduler configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// How often pending targets past their due date are flipped to overdue.
    pub overdue_sweep_interval: Duration,
    /// How often the pending notification queue is drained.
    pub dispatch_interval: Duration,
    /// Rows fetched per dispatch pass.
    pub dispatch_batch_size: i64,
    /// How often deadline reminders are claimed.
    pub reminder_interval: Duration,
    /// Targets due within this window get a reminder.
    pub reminder_window: chrono::Duration,
    /// How often old notifications are purged.
    pub retention_interval: Duration,
    /// Sent or read notifications older than this many days are purged.
    pub notification_retention_days: i64,
    /// Telegram bot token. Without it bot notifications cannot be delivered.
    pub telegram_bot_token: Option<String>,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default  |
    /// |--------------------------------|----------|
    /// | `OVERDUE_SWEEP_INTERVAL_SECS`  | `300`    |
    /// | `DISPATCH_INTERVAL_SECS`       | `30`     |
    /// | `DISPATCH_BATCH_SIZE`          | `100`    |
    /// | `REMINDER_INTERVAL_SECS`       | `900`    |
    /// | `REMINDER_WINDOW_HOURS`        | `24`     |
    /// | `RETENTION_INTERVAL_SECS`      | `86400`  |
    /// | `NOTIFICATION_RETENTION_DAYS`  | `30`     |
    /// | `TELEGRAM_BOT_TOKEN`           | unset    |
    pub fn from_env() -> Self {
        let secs = |name: &str, default: u64| Duration::from_secs(parse_env(name, default));

        Self {
            overdue_sweep_interval: secs("OVERDUE_SWEEP_INTERVAL_SECS", 300),
            dispatch_interval: secs("DISPATCH_INTERVAL_SECS", 30),
            dispatch_batch_size: parse_env("DISPATCH_BATCH_SIZE", 100),
            reminder_interval: secs("REMINDER_INTERVAL_SECS", 900),
            reminder_window: chrono::Duration::hours(parse_env("REMINDER_WINDOW_HOURS", 24)),
            retention_interval: secs("RETENTION_INTERVAL_SECS", 86_400),
            notification_retention_days: parse_env(
                "NOTIFICATION_RETENTION_DAYS",
                DEFAULT_RETENTION_DAYS,
            ),
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
        }
    }
}

/// Parse `name` from the environment, falling back to `default` when unset.
///
/// Panics on a value that does not parse, like the server configuration.
fn parse_env<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid number")),
        Err(_) => default,
    }
}
