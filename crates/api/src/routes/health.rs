//! Liveness plus a view of the notification queue.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tutor_core::notifications::MAX_DELIVERY_ATTEMPTS;
use tutor_db::repositories::NotificationRepo;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database cannot be reached.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether Telegram login and bot delivery are configured.
    pub telegram_bot: bool,
    /// Absent when the database is down.
    pub notifications: Option<QueueStats>,
}

#[derive(Serialize)]
pub struct QueueStats {
    /// Pending rows the dispatcher will still try.
    pub pending: i64,
    /// Pending rows that reached the attempt limit.
    pub exhausted: i64,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = tutor_db::health_check(&state.pool).await.is_ok();

    let notifications = if db_healthy {
        match NotificationRepo::backlog(&state.pool, MAX_DELIVERY_ATTEMPTS).await {
            Ok((pending, exhausted)) => Some(QueueStats { pending, exhausted }),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read notification backlog");
                None
            }
        }
    } else {
        None
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        telegram_bot: state.config.telegram_bot_token.is_some(),
        notifications,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
