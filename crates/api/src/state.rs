use std::sync::Arc;

use tutor_core::grading::GradeScale;
use tutor_events::Notifier;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Every collaborator is injected here at startup; handlers never reach for
/// globals. Cloning is cheap (pool and `Arc`s).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tutor_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Best-effort notification enqueue.
    pub notifier: Notifier,
    /// Score-to-grade policy used when grading.
    pub grade_scale: Arc<dyn GradeScale>,
}

impl AppState {
    pub fn new(
        pool: tutor_db::DbPool,
        config: Arc<ServerConfig>,
        grade_scale: Arc<dyn GradeScale>,
    ) -> Self {
        Self {
            notifier: Notifier::new(pool.clone()),
            pool,
            config,
            grade_scale,
        }
    }
}
