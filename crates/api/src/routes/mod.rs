pub mod assignment;
pub mod auth;
pub mod chat;
pub mod grading;
pub mod group;
pub mod health;
pub mod notification;
pub mod target;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/telegram                                   Telegram login (public)
/// /auth/me                                         current user
/// /auth/invite/redeem                              guest -> student
/// /auth/invites                                    list, issue (teacher)
/// /auth/students                                   student directory (teacher)
///
/// /groups                                          list, create
/// /groups/{id}                                     get, update, delete
/// /groups/{id}/members                             list, add
/// /groups/{id}/members/{user_id}                   remove
///
/// /assignments                                     list, create (teacher)
/// /assignments/{id}                                get, update, delete
/// /assignments/{id}/archive                        archive
/// /assignments/{id}/targets                        per-student progress
///
/// /targets                                         student's own targets
/// /targets/{id}                                    get
/// /targets/{id}/submit                             submit attempt (student)
/// /targets/{id}/submissions                        attempts
/// /targets/{id}/feedback                           grading history
/// /targets/{id}/draft                              get, save, discard (student)
/// /targets/{id}/grade                              grade (teacher)
/// /targets/{id}/regrade                            re-grade (teacher)
///
/// /grading/inbox                                   awaiting review (teacher)
/// /grading/graded                                  graded (teacher)
/// /grading/statistics                              dashboard numbers (teacher)
///
/// /notifications                                   list
/// /notifications/read-all                          mark all read
/// /notifications/unread-count                      unread count
/// /notifications/{id}/read                         mark read
///
/// /chat/threads                                    list
/// /chat/direct                                     open direct thread
/// /chat/groups/{group_id}                          open group thread
/// /chat/threads/{id}/messages                      list, send
/// /chat/threads/{id}/read                          mark read
/// /chat/threads/{id}/unread-count                  unread count
/// /chat/messages/{id}                              edit, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/groups", group::router())
        .nest("/assignments", assignment::router())
        .nest("/targets", target::router())
        .nest("/grading", grading::router())
        .nest("/notifications", notification::router())
        .nest("/chat", chat::router())
}
