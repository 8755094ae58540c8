//! Route definitions for the `/assignments` resource. Teacher only.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assignment;
use crate::state::AppState;

/// Routes mounted at `/assignments`.
///
/// ```text
/// GET    /                          -> list_assignments (?status=)
/// POST   /                          -> create_assignment
/// GET    /{id}                      -> get_assignment
/// PUT    /{id}                      -> update_assignment
/// DELETE /{id}                      -> delete_assignment
/// POST   /{id}/archive              -> archive_assignment
/// GET    /{id}/targets              -> list_targets
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(assignment::list_assignments).post(assignment::create_assignment),
        )
        .route(
            "/{id}",
            get(assignment::get_assignment)
                .put(assignment::update_assignment)
                .delete(assignment::delete_assignment),
        )
        .route("/{id}/archive", post(assignment::archive_assignment))
        .route("/{id}/targets", get(assignment::list_targets))
}
