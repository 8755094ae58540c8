//! Route definitions for the `/groups` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::group;
use crate::state::AppState;

/// Routes mounted at `/groups`.
///
/// ```text
/// GET    /                          -> list_groups
/// POST   /                          -> create_group (teacher)
/// GET    /{id}                      -> get_group
/// PUT    /{id}                      -> update_group (owner)
/// DELETE /{id}                      -> delete_group (owner)
/// GET    /{id}/members              -> list_members
/// POST   /{id}/members              -> add_member (owner)
/// DELETE /{id}/members/{user_id}    -> remove_member (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(group::list_groups).post(group::create_group))
        .route(
            "/{id}",
            get(group::get_group)
                .put(group::update_group)
                .delete(group::delete_group),
        )
        .route(
            "/{id}/members",
            get(group::list_members).post(group::add_member),
        )
        .route("/{id}/members/{user_id}", delete(group::remove_member))
}
