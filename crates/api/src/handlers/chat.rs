//! Handlers for `/chat`: direct student-teacher threads and group threads.
//!
//! Access is decided per thread: a direct thread belongs to its student and
//! teacher, a group thread to the group's teacher and roster.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tutor_core::chat::{
    can_access_thread, validate_message_content, MESSAGE_KIND_MESSAGE, THREAD_KIND_GROUP,
};
use tutor_core::error::CoreError;
use tutor_core::notifications::{self, message_preview};
use tutor_core::pagination::{clamp_limit, DEFAULT_LIMIT, MAX_LIMIT};
use tutor_core::roles::{ROLE_STUDENT, ROLE_TEACHER};
use tutor_core::types::DbId;
use tutor_db::models::chat::{ChatMessage, ChatThread, NewChatMessage, SendChatMessage};
use tutor_db::repositories::{ChatRepo, GroupRepo, UserRepo};
use tutor_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::current_user;
use crate::handlers::group::ensure_group_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireMember;
use crate::query::CursorParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /chat/direct`.
#[derive(Debug, Deserialize)]
pub struct DirectThreadRequest {
    /// The other side: a student when a teacher asks, a teacher when a
    /// student asks.
    pub peer_id: DbId,
}

/// Request body for `PUT /chat/messages/{id}`.
#[derive(Debug, Deserialize)]
pub struct EditMessageRequest {
    pub text: String,
}

/// A thread in the caller's thread list.
#[derive(Debug, Serialize)]
pub struct ThreadSummary {
    #[serde(flatten)]
    pub thread: ChatThread,
    pub unread_count: i64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a thread the caller may read and post in.
async fn ensure_thread_access(
    pool: &DbPool,
    thread_id: DbId,
    user_id: DbId,
) -> AppResult<ChatThread> {
    let thread = ChatRepo::find_thread(pool, thread_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ChatThread",
            id: thread_id,
        }))?;

    let is_group_member = match (thread.kind.as_str(), thread.group_id) {
        (THREAD_KIND_GROUP, Some(group_id)) => {
            GroupRepo::is_member(pool, group_id, user_id).await?
        }
        _ => false,
    };

    if !can_access_thread(
        &thread.kind,
        thread.student_id,
        thread.teacher_id,
        user_id,
        is_group_member,
    ) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not a participant of this chat".into(),
        )));
    }
    Ok(thread)
}

/// Everyone who should hear about a new message in `thread`.
async fn participants(pool: &DbPool, thread: &ChatThread) -> Result<Vec<DbId>, sqlx::Error> {
    let mut ids = vec![thread.teacher_id];
    if let Some(student_id) = thread.student_id {
        ids.push(student_id);
    }
    if let Some(group_id) = thread.group_id {
        ids.extend(GroupRepo::member_ids(pool, group_id).await?);
    }
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

/// Load a live message written by the caller.
async fn ensure_own_message(
    pool: &DbPool,
    message_id: DbId,
    user_id: DbId,
) -> AppResult<ChatMessage> {
    let message = ChatRepo::find_message(pool, message_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ChatMessage",
            id: message_id,
        }))?;
    if message.author_id != Some(user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only change your own messages".into(),
        )));
    }
    Ok(message)
}

// ---------------------------------------------------------------------------
// Threads
// ---------------------------------------------------------------------------

/// GET /api/v1/chat/threads
///
/// The caller's threads, most recently active first, with unread counts.
pub async fn list_threads(
    RequireMember(auth): RequireMember,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ThreadSummary>>>> {
    let threads = ChatRepo::list_threads_for_user(&state.pool, auth.user_id).await?;

    let mut summaries = Vec::with_capacity(threads.len());
    for thread in threads {
        let unread_count = ChatRepo::unread_count(&state.pool, thread.id, auth.user_id).await?;
        summaries.push(ThreadSummary {
            thread,
            unread_count,
        });
    }
    Ok(Json(DataResponse { data: summaries }))
}

/// POST /api/v1/chat/direct
///
/// Open (or reopen) the direct thread between a student and a teacher.
pub async fn open_direct_thread(
    RequireMember(auth): RequireMember,
    State(state): State<AppState>,
    Json(input): Json<DirectThreadRequest>,
) -> AppResult<Json<DataResponse<ChatThread>>> {
    let peer = UserRepo::find_by_id(&state.pool, input.peer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.peer_id,
        }))?;

    let (student_id, teacher_id) = match (auth.role.as_str(), peer.role.as_str()) {
        (ROLE_TEACHER, ROLE_STUDENT) => (peer.id, auth.user_id),
        (ROLE_STUDENT, ROLE_TEACHER) => (auth.user_id, peer.id),
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Direct chats are between a student and a teacher".into(),
            )))
        }
    };

    let thread =
        ChatRepo::get_or_create_student_teacher(&state.pool, student_id, teacher_id).await?;
    Ok(Json(DataResponse { data: thread }))
}

/// POST /api/v1/chat/groups/{group_id}
///
/// Open the thread of a group the caller teaches or belongs to.
pub async fn open_group_thread(
    RequireMember(auth): RequireMember,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ChatThread>>> {
    let group = ensure_group_exists(&state.pool, group_id).await?;
    if group.teacher_id != auth.user_id
        && !GroupRepo::is_member(&state.pool, group_id, auth.user_id).await?
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not a member of this group".into(),
        )));
    }

    let thread = ChatRepo::get_or_create_group(&state.pool, group.id, group.teacher_id).await?;
    Ok(Json(DataResponse { data: thread }))
}

/// POST /api/v1/chat/threads/{id}/read
pub async fn mark_thread_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(thread_id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_thread_access(&state.pool, thread_id, auth.user_id).await?;
    ChatRepo::mark_read(&state.pool, thread_id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/chat/threads/{id}/unread-count
pub async fn thread_unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(thread_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    ensure_thread_access(&state.pool, thread_id, auth.user_id).await?;
    let count = ChatRepo::unread_count(&state.pool, thread_id, auth.user_id).await?;
    Ok(Json(serde_json::json!({ "data": { "count": count } })))
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// GET /api/v1/chat/threads/{id}/messages?before=&limit=
///
/// Newest first. Pass the oldest `created_at` seen as `before` to page back.
pub async fn list_messages(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(thread_id): Path<DbId>,
    Query(params): Query<CursorParams>,
) -> AppResult<Json<serde_json::Value>> {
    ensure_thread_access(&state.pool, thread_id, auth.user_id).await?;
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let messages = ChatRepo::list_messages(&state.pool, thread_id, params.before, limit).await?;
    Ok(Json(serde_json::json!({ "data": messages })))
}

/// POST /api/v1/chat/threads/{id}/messages
///
/// Every other participant gets a `new_message` notification.
pub async fn send_message(
    RequireMember(auth): RequireMember,
    State(state): State<AppState>,
    Path(thread_id): Path<DbId>,
    Json(input): Json<SendChatMessage>,
) -> AppResult<impl IntoResponse> {
    validate_message_content(input.text.as_deref(), &input.media_ids)?;
    let thread = ensure_thread_access(&state.pool, thread_id, auth.user_id).await?;
    let author = current_user(&state, &auth).await?;

    let new = NewChatMessage {
        thread_id,
        author_id: Some(author.id),
        text: input.text,
        media_ids: input.media_ids,
        kind: MESSAGE_KIND_MESSAGE.to_string(),
    };
    let message = ChatRepo::insert_message(&state.pool, &new).await?;

    // Sending counts as reading everything before it.
    if let Err(e) = ChatRepo::mark_read(&state.pool, thread_id, author.id).await {
        tracing::warn!(error = %e, thread_id, "Failed to advance read marker");
    }

    match participants(&state.pool, &thread).await {
        Ok(ids) => {
            let recipients: Vec<DbId> = ids.into_iter().filter(|id| *id != author.id).collect();
            let preview = message_preview(message.text.as_deref(), message.media_ids.len());
            state
                .notifier
                .notify_many(
                    &recipients,
                    &notifications::new_message(&author.display_name(), &preview),
                    &serde_json::json!({ "thread_id": thread_id, "message_id": message.id }),
                )
                .await;
        }
        Err(e) => {
            tracing::warn!(error = %e, thread_id, "Failed to resolve chat participants");
        }
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// PUT /api/v1/chat/messages/{id}
pub async fn edit_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(message_id): Path<DbId>,
    Json(input): Json<EditMessageRequest>,
) -> AppResult<Json<DataResponse<ChatMessage>>> {
    validate_message_content(Some(&input.text), &[])?;
    ensure_own_message(&state.pool, message_id, auth.user_id).await?;

    let message = ChatRepo::edit_message(&state.pool, message_id, auth.user_id, &input.text)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ChatMessage",
            id: message_id,
        }))?;
    Ok(Json(DataResponse { data: message }))
}

/// DELETE /api/v1/chat/messages/{id}
pub async fn delete_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(message_id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_own_message(&state.pool, message_id, auth.user_id).await?;
    ChatRepo::soft_delete_message(&state.pool, message_id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
