//! Route definitions for the `/targets` resource.
//!
//! Student work on a single assignment, plus the teacher's grading
//! actions on it.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{grading, target};
use crate::state::AppState;

/// Routes mounted at `/targets`.
///
/// ```text
/// GET    /                          -> list_my_targets (student, ?status=)
/// GET    /{id}                      -> get_target
/// POST   /{id}/submit               -> submit (student)
/// GET    /{id}/submissions          -> list_submissions
/// GET    /{id}/feedback             -> list_feedback
/// GET    /{id}/draft                -> get_draft (student)
/// PUT    /{id}/draft                -> save_draft (student)
/// DELETE /{id}/draft                -> delete_draft (student)
/// POST   /{id}/grade                -> grade (teacher)
/// POST   /{id}/regrade              -> regrade (teacher)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(target::list_my_targets))
        .route("/{id}", get(target::get_target))
        .route("/{id}/submit", post(target::submit))
        .route("/{id}/submissions", get(target::list_submissions))
        .route("/{id}/feedback", get(target::list_feedback))
        .route(
            "/{id}/draft",
            get(target::get_draft)
                .put(target::save_draft)
                .delete(target::delete_draft),
        )
        .route("/{id}/grade", post(grading::grade))
        .route("/{id}/regrade", post(grading::regrade))
}
