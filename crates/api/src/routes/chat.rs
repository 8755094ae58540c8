//! Route definitions for the `/chat` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// GET    /threads                   -> list_threads
/// POST   /direct                    -> open_direct_thread
/// POST   /groups/{group_id}         -> open_group_thread
/// GET    /threads/{id}/messages     -> list_messages (?before=&limit=)
/// POST   /threads/{id}/messages     -> send_message
/// POST   /threads/{id}/read         -> mark_thread_read
/// GET    /threads/{id}/unread-count -> thread_unread_count
/// PUT    /messages/{id}             -> edit_message
/// DELETE /messages/{id}             -> delete_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/threads", get(chat::list_threads))
        .route("/direct", post(chat::open_direct_thread))
        .route("/groups/{group_id}", post(chat::open_group_thread))
        .route(
            "/threads/{id}/messages",
            get(chat::list_messages).post(chat::send_message),
        )
        .route("/threads/{id}/read", post(chat::mark_thread_read))
        .route("/threads/{id}/unread-count", get(chat::thread_unread_count))
        .route(
            "/messages/{id}",
            put(chat::edit_message).delete(chat::delete_message),
        )
}
