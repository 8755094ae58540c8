//! Handlers for the `/assignments` resource (teacher side).
//!
//! Creating an assignment distributes it: one target per student of the
//! group (or the single named student) is written in the same transaction
//! as the assignment, then each student is notified best-effort.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tutor_core::coursework::{
    resolve_audience, validate_assignment_status, validate_description, validate_title, Audience,
};
use tutor_core::error::CoreError;
use tutor_core::notifications;
use tutor_core::roles::ROLE_STUDENT;
use tutor_core::types::DbId;
use tutor_db::models::assignment::{Assignment, CreateAssignment, UpdateAssignment};
use tutor_db::repositories::{AssignmentRepo, AssignmentTargetRepo, GroupRepo, UserRepo};
use tutor_db::DbPool;
use tutor_events::Outgoing;

use crate::error::{AppError, AppResult};
use crate::handlers::group::ensure_group_owner;
use crate::middleware::rbac::RequireTeacher;
use crate::query::StatusFilter;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a live assignment owned by `teacher_id`; 404 if missing, 403 otherwise.
pub async fn ensure_assignment_owner(
    pool: &DbPool,
    assignment_id: DbId,
    teacher_id: DbId,
) -> AppResult<Assignment> {
    let assignment = AssignmentRepo::find_by_id(pool, assignment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assignment",
            id: assignment_id,
        }))?;
    if assignment.teacher_id != teacher_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the assignment's teacher can do this".into(),
        )));
    }
    Ok(assignment)
}

/// Snapshot of the users an audience resolves to, sorted and unique. A group
/// resolves to its whole roster.
async fn resolve_students(
    pool: &DbPool,
    audience: Audience,
    teacher_id: DbId,
) -> AppResult<Vec<DbId>> {
    let mut ids = match audience {
        Audience::Group(group_id) => {
            ensure_group_owner(pool, group_id, teacher_id).await?;
            GroupRepo::member_ids(pool, group_id).await?
        }
        Audience::Student(student_id) => {
            let student = UserRepo::find_by_id(pool, student_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "User",
                    id: student_id,
                }))?;
            if student.role != ROLE_STUDENT {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "User {student_id} is not a student"
                ))));
            }
            vec![student.id]
        }
    };
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

/// POST /api/v1/assignments
pub async fn create_assignment(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Json(input): Json<CreateAssignment>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title)?;
    validate_description(input.description.as_deref())?;
    let audience = resolve_audience(input.group_id, input.student_id)?;

    let student_ids = resolve_students(&state.pool, audience, teacher.user_id).await?;

    let (assignment, targets) =
        AssignmentRepo::create_with_targets(&state.pool, teacher.user_id, &input, &student_ids)
            .await?;

    tracing::info!(
        teacher_id = teacher.user_id,
        assignment_id = assignment.id,
        targets = targets.len(),
        "Assignment created"
    );

    let outgoing = targets
        .iter()
        .map(|t| {
            Outgoing::new(
                t.student_id,
                notifications::new_assignment(&assignment.title, assignment.due_date),
                serde_json::json!({ "assignment_id": assignment.id, "target_id": t.id }),
            )
        })
        .collect();
    state.notifier.notify_all(outgoing).await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "data": { "assignment": assignment, "targets": targets }
        })),
    ))
}

/// GET /api/v1/assignments?status=
pub async fn list_assignments(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Query(params): Query<StatusFilter>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(status) = &params.status {
        validate_assignment_status(status)?;
    }
    let assignments =
        AssignmentRepo::list_for_teacher(&state.pool, teacher.user_id, params.status.as_deref())
            .await?;
    Ok(Json(serde_json::json!({ "data": assignments })))
}

/// GET /api/v1/assignments/{id}
pub async fn get_assignment(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Path(assignment_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Assignment>>> {
    let assignment = ensure_assignment_owner(&state.pool, assignment_id, teacher.user_id).await?;
    Ok(Json(DataResponse { data: assignment }))
}

/// PUT /api/v1/assignments/{id}
///
/// Audience is fixed at creation; only descriptive fields and the due date
/// change. Moving the due date does not touch targets already overdue.
pub async fn update_assignment(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Path(assignment_id): Path<DbId>,
    Json(input): Json<UpdateAssignment>,
) -> AppResult<Json<DataResponse<Assignment>>> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    validate_description(input.description.as_deref())?;
    ensure_assignment_owner(&state.pool, assignment_id, teacher.user_id).await?;

    let assignment = AssignmentRepo::update(&state.pool, assignment_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assignment",
            id: assignment_id,
        }))?;
    Ok(Json(DataResponse { data: assignment }))
}

/// POST /api/v1/assignments/{id}/archive
///
/// Archived assignments stay visible but accept no further submissions.
pub async fn archive_assignment(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Path(assignment_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Assignment>>> {
    ensure_assignment_owner(&state.pool, assignment_id, teacher.user_id).await?;

    let assignment = AssignmentRepo::archive(&state.pool, assignment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assignment",
            id: assignment_id,
        }))?;

    tracing::info!(assignment_id, "Assignment archived");
    Ok(Json(DataResponse { data: assignment }))
}

/// DELETE /api/v1/assignments/{id}
pub async fn delete_assignment(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Path(assignment_id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_assignment_owner(&state.pool, assignment_id, teacher.user_id).await?;
    AssignmentRepo::soft_delete(&state.pool, assignment_id).await?;

    tracing::info!(assignment_id, "Assignment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/assignments/{id}/targets
///
/// Per-student progress on one assignment.
pub async fn list_targets(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Path(assignment_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    ensure_assignment_owner(&state.pool, assignment_id, teacher.user_id).await?;
    let targets = AssignmentTargetRepo::list_for_assignment(&state.pool, assignment_id).await?;
    Ok(Json(serde_json::json!({ "data": targets })))
}
