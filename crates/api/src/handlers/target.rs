//! Handlers for `/targets`: a student's per-assignment work.
//!
//! Students list their targets, autosave a draft and submit attempts. The
//! owning teacher can read the same target, its attempts and its feedback.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tutor_core::coursework::{
    ensure_submittable, is_late, validate_media_refs, validate_submission_content,
    validate_target_status,
};
use tutor_core::error::CoreError;
use tutor_core::notifications;
use tutor_core::types::{DbId, MediaRef};
use tutor_db::models::assignment_target::TargetWithAssignment;
use tutor_db::models::draft::SaveDraft;
use tutor_db::models::submission::NewSubmission;
use tutor_db::repositories::{
    AssignmentTargetRepo, DraftRepo, FeedbackRepo, SubmissionRepo, UserRepo,
};
use tutor_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStudent;
use crate::query::StatusFilter;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /targets/{id}/submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub text: Option<String>,
    #[serde(default)]
    pub media_ids: Vec<MediaRef>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a target with its assignment or fail with 404.
pub async fn load_target(pool: &DbPool, target_id: DbId) -> AppResult<TargetWithAssignment> {
    AssignmentTargetRepo::find_with_assignment(pool, target_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AssignmentTarget",
            id: target_id,
        }))
}

/// The target's student or the assignment's teacher.
fn ensure_participant(target: &TargetWithAssignment, user_id: DbId) -> AppResult<()> {
    if target.student_id == user_id || target.teacher_id == user_id {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(
        "You do not have access to this assignment".into(),
    )))
}

/// The target's own student only.
fn ensure_owner(target: &TargetWithAssignment, student_id: DbId) -> AppResult<()> {
    if target.student_id == student_id {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(
        "This assignment belongs to another student".into(),
    )))
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// GET /api/v1/targets?status=
pub async fn list_my_targets(
    RequireStudent(student): RequireStudent,
    State(state): State<AppState>,
    Query(params): Query<StatusFilter>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(status) = &params.status {
        validate_target_status(status)?;
    }
    let targets = AssignmentTargetRepo::list_for_student(
        &state.pool,
        student.user_id,
        params.status.as_deref(),
    )
    .await?;
    Ok(Json(serde_json::json!({ "data": targets })))
}

/// GET /api/v1/targets/{id}
pub async fn get_target(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(target_id): Path<DbId>,
) -> AppResult<Json<DataResponse<TargetWithAssignment>>> {
    let target = load_target(&state.pool, target_id).await?;
    ensure_participant(&target, auth.user_id)?;
    Ok(Json(DataResponse { data: target }))
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

/// POST /api/v1/targets/{id}/submit
///
/// Record a new attempt. Allowed from `pending`, `submitted` and `overdue`;
/// lateness is fixed at submission time and never cleared. The draft is
/// discarded and the teacher is notified.
pub async fn submit(
    RequireStudent(student): RequireStudent,
    State(state): State<AppState>,
    Path(target_id): Path<DbId>,
    Json(input): Json<SubmitRequest>,
) -> AppResult<impl IntoResponse> {
    validate_submission_content(input.text.as_deref(), &input.media_ids)?;

    let target = load_target(&state.pool, target_id).await?;
    ensure_owner(&target, student.user_id)?;
    ensure_submittable(&target.status, &target.assignment_status)?;

    let now = Utc::now();
    let late = is_late(now, target.due_date);
    let new = NewSubmission {
        assignment_target_id: target.id,
        student_id: student.user_id,
        text: input.text,
        media_ids: input.media_ids,
        is_late: late,
        submitted_at: now,
    };

    // The guard lost a race with grading or archiving.
    let (submission, updated) = SubmissionRepo::submit(&state.pool, &new)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(
                "Assignment no longer accepts submissions".into(),
            ))
        })?;

    tracing::info!(
        student_id = student.user_id,
        target_id,
        submission_id = submission.id,
        attempt = submission.attempt,
        is_late = late,
        "Assignment submitted"
    );

    // The attempt is committed; a failed name lookup only degrades the text.
    let student_name = match UserRepo::find_by_id(&state.pool, student.user_id).await {
        Ok(Some(user)) => user.display_name(),
        Ok(None) => format!("#{}", student.user_id),
        Err(e) => {
            tracing::warn!(error = %e, student_id = student.user_id, "Failed to load student name");
            format!("#{}", student.user_id)
        }
    };
    state
        .notifier
        .notify(
            target.teacher_id,
            notifications::submission_received(&student_name, &target.title, late),
            serde_json::json!({
                "assignment_id": target.assignment_id,
                "target_id": target.id,
                "submission_id": submission.id,
            }),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "data": { "submission": submission, "target": updated }
        })),
    ))
}

/// GET /api/v1/targets/{id}/submissions
pub async fn list_submissions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(target_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let target = load_target(&state.pool, target_id).await?;
    ensure_participant(&target, auth.user_id)?;
    let submissions = SubmissionRepo::list_for_target(&state.pool, target_id).await?;
    Ok(Json(serde_json::json!({ "data": submissions })))
}

/// GET /api/v1/targets/{id}/feedback
///
/// Grading history, newest first. The first entry is authoritative.
pub async fn list_feedback(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(target_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let target = load_target(&state.pool, target_id).await?;
    ensure_participant(&target, auth.user_id)?;
    let feedback = FeedbackRepo::list_for_target(&state.pool, target_id).await?;
    Ok(Json(serde_json::json!({ "data": feedback })))
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// GET /api/v1/targets/{id}/draft
///
/// Returns `{"data": null}` when nothing has been saved.
pub async fn get_draft(
    RequireStudent(student): RequireStudent,
    State(state): State<AppState>,
    Path(target_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let target = load_target(&state.pool, target_id).await?;
    ensure_owner(&target, student.user_id)?;
    let draft = DraftRepo::find_for_target(&state.pool, target_id).await?;
    Ok(Json(serde_json::json!({ "data": draft })))
}

/// PUT /api/v1/targets/{id}/draft
///
/// Overwrite the single draft slot for the target.
pub async fn save_draft(
    RequireStudent(student): RequireStudent,
    State(state): State<AppState>,
    Path(target_id): Path<DbId>,
    Json(input): Json<SaveDraft>,
) -> AppResult<impl IntoResponse> {
    validate_media_refs(&input.media_ids)?;

    let target = load_target(&state.pool, target_id).await?;
    ensure_owner(&target, student.user_id)?;
    ensure_submittable(&target.status, &target.assignment_status)?;

    let draft = DraftRepo::upsert(&state.pool, target_id, student.user_id, &input).await?;
    Ok(Json(DataResponse { data: draft }))
}

/// DELETE /api/v1/targets/{id}/draft
pub async fn delete_draft(
    RequireStudent(student): RequireStudent,
    State(state): State<AppState>,
    Path(target_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let target = load_target(&state.pool, target_id).await?;
    ensure_owner(&target, student.user_id)?;
    DraftRepo::delete_for_target(&state.pool, target_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
