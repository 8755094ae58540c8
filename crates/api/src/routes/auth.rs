//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /telegram                  -> telegram_login (public)
/// GET    /me                        -> me
/// POST   /invite/redeem             -> redeem_invite (guest)
/// GET    /invites                   -> list_invites (teacher)
/// POST   /invites                   -> create_invite (teacher)
/// GET    /students                  -> list_students (teacher)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/telegram", post(auth::telegram_login))
        .route("/me", get(auth::me))
        .route("/invite/redeem", post(auth::redeem_invite))
        .route("/invites", get(auth::list_invites).post(auth::create_invite))
        .route("/students", get(auth::list_students))
}
