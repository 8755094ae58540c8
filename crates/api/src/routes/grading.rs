//! Route definitions for the teacher's review queues at `/grading`.

use axum::routing::get;
use axum::Router;

use crate::handlers::grading;
use crate::state::AppState;

/// Routes mounted at `/grading`.
///
/// ```text
/// GET    /inbox                     -> inbox (?limit=&offset=)
/// GET    /graded                    -> graded (?limit=&offset=)
/// GET    /statistics                -> statistics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inbox", get(grading::inbox))
        .route("/graded", get(grading::graded))
        .route("/statistics", get(grading::statistics))
}
