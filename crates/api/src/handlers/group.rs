//! Handlers for the `/groups` resource: group CRUD and the roster.
//!
//! Only the owning teacher mutates a group. Members may read the group and
//! its roster.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tutor_core::coursework::{validate_group_role, GROUP_ROLE_STUDENT};
use tutor_core::error::CoreError;
use tutor_core::notifications;
use tutor_core::roles::ROLE_STUDENT;
use tutor_core::types::DbId;
use tutor_db::models::group::{CreateGroup, Group, UpdateGroup};
use tutor_db::repositories::{GroupRepo, UserRepo};
use tutor_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireTeacher;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum length of a group name.
const MAX_GROUP_NAME_LENGTH: usize = 200;

/// Request body for `POST /groups/{id}/members`.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: DbId,
    /// `student` (default) or `assistant`.
    pub role: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_group_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Group name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_GROUP_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Group name exceeds maximum length of {MAX_GROUP_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Load a live group or fail with 404.
pub async fn ensure_group_exists(pool: &DbPool, group_id: DbId) -> AppResult<Group> {
    GroupRepo::find_by_id(pool, group_id).await?.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Group",
        id: group_id,
    }))
}

/// Load a live group owned by `teacher_id`; 404 if missing, 403 otherwise.
pub async fn ensure_group_owner(
    pool: &DbPool,
    group_id: DbId,
    teacher_id: DbId,
) -> AppResult<Group> {
    let group = ensure_group_exists(pool, group_id).await?;
    if group.teacher_id != teacher_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the group's teacher can do this".into(),
        )));
    }
    Ok(group)
}

/// Load a live group the caller owns or belongs to.
async fn ensure_group_visible(pool: &DbPool, group_id: DbId, auth: &AuthUser) -> AppResult<Group> {
    let group = ensure_group_exists(pool, group_id).await?;
    if group.teacher_id == auth.user_id || GroupRepo::is_member(pool, group_id, auth.user_id).await?
    {
        return Ok(group);
    }
    Err(AppError::Core(CoreError::Forbidden(
        "You are not a member of this group".into(),
    )))
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// POST /api/v1/groups
pub async fn create_group(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Json(input): Json<CreateGroup>,
) -> AppResult<impl IntoResponse> {
    validate_group_name(&input.name)?;

    let group = GroupRepo::create(&state.pool, teacher.user_id, &input).await?;

    tracing::info!(teacher_id = teacher.user_id, group_id = group.id, "Group created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: group })))
}

/// GET /api/v1/groups
///
/// Teachers see the groups they own; everyone else the groups they belong to.
pub async fn list_groups(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let groups = if auth.is_teacher() {
        GroupRepo::list_for_teacher(&state.pool, auth.user_id).await?
    } else {
        GroupRepo::list_for_member(&state.pool, auth.user_id).await?
    };
    Ok(Json(serde_json::json!({ "data": groups })))
}

/// GET /api/v1/groups/{id}
pub async fn get_group(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Group>>> {
    let group = ensure_group_visible(&state.pool, group_id, &auth).await?;
    Ok(Json(DataResponse { data: group }))
}

/// PUT /api/v1/groups/{id}
pub async fn update_group(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
    Json(input): Json<UpdateGroup>,
) -> AppResult<Json<DataResponse<Group>>> {
    if let Some(name) = &input.name {
        validate_group_name(name)?;
    }
    ensure_group_owner(&state.pool, group_id, teacher.user_id).await?;

    let group = GroupRepo::update(&state.pool, group_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Group",
            id: group_id,
        }))?;
    Ok(Json(DataResponse { data: group }))
}

/// DELETE /api/v1/groups/{id}
pub async fn delete_group(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_group_owner(&state.pool, group_id, teacher.user_id).await?;
    GroupRepo::soft_delete(&state.pool, group_id).await?;

    tracing::info!(teacher_id = teacher.user_id, group_id, "Group deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// GET /api/v1/groups/{id}/members
pub async fn list_members(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    ensure_group_visible(&state.pool, group_id, &auth).await?;
    let members = GroupRepo::list_members(&state.pool, group_id).await?;
    Ok(Json(serde_json::json!({ "data": members })))
}

/// POST /api/v1/groups/{id}/members
///
/// Add a student to the roster and tell them about it. Adding someone who
/// is already on the roster is a 409.
pub async fn add_member(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<impl IntoResponse> {
    let role = input.role.as_deref().unwrap_or(GROUP_ROLE_STUDENT);
    validate_group_role(role)?;

    let group = ensure_group_owner(&state.pool, group_id, teacher.user_id).await?;

    let user = UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }))?;
    if user.role != ROLE_STUDENT {
        return Err(AppError::Core(CoreError::Validation(format!(
            "User {} is not a student",
            user.id
        ))));
    }

    let member = GroupRepo::add_member(&state.pool, group_id, user.id, role).await?;

    state
        .notifier
        .notify(
            user.id,
            notifications::group_invite(&group.name),
            serde_json::json!({ "group_id": group.id }),
        )
        .await;

    tracing::info!(group_id, user_id = user.id, role, "Group member added");
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// DELETE /api/v1/groups/{id}/members/{user_id}
pub async fn remove_member(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Path((group_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_group_owner(&state.pool, group_id, teacher.user_id).await?;

    if !GroupRepo::remove_member(&state.pool, group_id, user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "GroupMember",
            id: user_id,
        }));
    }

    tracing::info!(group_id, user_id, "Group member removed");
    Ok(StatusCode::NO_CONTENT)
}
