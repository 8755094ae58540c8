use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tutor_events::delivery::telegram::DisabledMessenger;
use tutor_events::{ChannelRegistry, Messenger, NotificationDispatcher, Notifier, TelegramBot};
use tutor_worker::{jobs, WorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutor_worker=debug,tutor_events=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env();
    tracing::info!(
        sweep_secs = config.overdue_sweep_interval.as_secs(),
        dispatch_secs = config.dispatch_interval.as_secs(),
        "Loaded worker configuration"
    );

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = tutor_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    tutor_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tutor_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database ready");

    let messenger: Arc<dyn Messenger> = match &config.telegram_bot_token {
        Some(token) => Arc::new(TelegramBot::new(token).context("Failed to build bot client")?),
        None => {
            tracing::warn!("TELEGRAM_BOT_TOKEN not set; bot notifications will not be delivered");
            Arc::new(DisabledMessenger)
        }
    };
    let notifier = Notifier::new(pool.clone());
    let dispatcher =
        NotificationDispatcher::new(pool.clone(), ChannelRegistry::standard(messenger))
            .with_batch_size(config.dispatch_batch_size);

    let cancel = CancellationToken::new();
    let handles = vec![
        tokio::spawn(jobs::overdue_sweep::run(
            pool.clone(),
            notifier.clone(),
            config.overdue_sweep_interval,
            cancel.clone(),
        )),
        tokio::spawn(jobs::deadline_reminders::run(
            pool.clone(),
            notifier,
            config.reminder_interval,
            config.reminder_window,
            cancel.clone(),
        )),
        tokio::spawn(jobs::notification_dispatch::run(
            dispatcher,
            config.dispatch_interval,
            cancel.clone(),
        )),
        tokio::spawn(jobs::notification_retention::run(
            pool,
            config.retention_interval,
            config.notification_retention_days,
            cancel.clone(),
        )),
    ];
    tracing::info!(jobs = handles.len(), "Worker started");

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping jobs");
    cancel.cancel();

    for handle in handles {
        let _ = tokio::time::timeout(Duration::from_secs(10), handle).await;
    }
    tracing::info!("Worker stopped");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
