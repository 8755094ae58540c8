//! Grading handlers and the teacher's review queues.
//!
//! A grade is one atomic unit in the database: feedback row, target status
//! and score, and the mirror onto the latest submission. The student
//! notification and the chat grade marker follow best-effort.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tutor_core::chat::MESSAGE_KIND_GRADE;
use tutor_core::coursework::{
    ensure_gradable, ensure_regradable, validate_media_refs, TARGET_STATUS_GRADED,
    TARGET_STATUS_SUBMITTED,
};
use tutor_core::error::CoreError;
use tutor_core::grading::{validate_comment, validate_score};
use tutor_core::notifications;
use tutor_core::types::{DbId, MediaRef};
use tutor_db::models::assignment_target::TargetWithAssignment;
use tutor_db::models::chat::NewChatMessage;
use tutor_db::models::feedback::NewFeedback;
use tutor_db::repositories::{AssignmentTargetRepo, ChatRepo, FeedbackRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::target::load_target;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireTeacher;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for grading and re-grading.
#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub score: Option<f64>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub media_ids: Vec<MediaRef>,
}

/// Which transition a grade request performs.
#[derive(Debug, Clone, Copy)]
enum GradeMode {
    First,
    Regrade,
}

impl GradeMode {
    fn expected_status(self) -> &'static str {
        match self {
            GradeMode::First => TARGET_STATUS_SUBMITTED,
            GradeMode::Regrade => TARGET_STATUS_GRADED,
        }
    }

    fn check(self, status: &str) -> Result<(), CoreError> {
        match self {
            GradeMode::First => ensure_gradable(status),
            GradeMode::Regrade => ensure_regradable(status),
        }
    }
}

/// Post a grade marker into the student-teacher thread.
async fn post_grade_marker(
    state: &AppState,
    target: &TargetWithAssignment,
    grade: &str,
) -> Result<(), sqlx::Error> {
    let thread =
        ChatRepo::get_or_create_student_teacher(&state.pool, target.student_id, target.teacher_id)
            .await?;
    let marker = NewChatMessage {
        thread_id: thread.id,
        author_id: Some(target.teacher_id),
        text: Some(format!("\"{}\" graded: {grade}", target.title)),
        media_ids: Vec::new(),
        kind: MESSAGE_KIND_GRADE.to_string(),
    };
    ChatRepo::insert_message(&state.pool, &marker).await?;
    Ok(())
}

async fn record_grade(
    state: &AppState,
    teacher: &AuthUser,
    target_id: DbId,
    input: GradeRequest,
    mode: GradeMode,
) -> AppResult<serde_json::Value> {
    validate_score(input.score)?;
    validate_comment(&input.comment)?;
    validate_media_refs(&input.media_ids)?;

    let target = load_target(&state.pool, target_id).await?;
    if target.teacher_id != teacher.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the assignment's teacher can grade it".into(),
        )));
    }
    mode.check(&target.status)?;

    let grade = state.grade_scale.grade_for(input.score);
    let new = NewFeedback {
        assignment_target_id: target.id,
        teacher_id: teacher.user_id,
        text: input.comment,
        score: input.score,
        grade: grade.clone(),
        media_ids: input.media_ids,
    };

    // A concurrent grade or a resubmission moved the target first.
    let (feedback, updated) = FeedbackRepo::record_grade(&state.pool, &new, mode.expected_status())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(
                "Assignment status changed, reload and try again".into(),
            ))
        })?;

    tracing::info!(
        teacher_id = teacher.user_id,
        target_id,
        feedback_id = feedback.id,
        grade = %grade,
        mode = ?mode,
        "Assignment graded"
    );

    state
        .notifier
        .notify(
            target.student_id,
            notifications::grade_received(&target.title, &grade, input.score),
            serde_json::json!({
                "assignment_id": target.assignment_id,
                "target_id": target.id,
                "feedback_id": feedback.id,
            }),
        )
        .await;
    if let Err(e) = post_grade_marker(state, &target, &grade).await {
        tracing::warn!(error = %e, target_id, "Failed to post grade marker");
    }

    Ok(serde_json::json!({ "feedback": feedback, "target": updated }))
}

// ---------------------------------------------------------------------------
// Grading
// ---------------------------------------------------------------------------

/// POST /api/v1/targets/{id}/grade
///
/// Grade a submitted target.
pub async fn grade(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Path(target_id): Path<DbId>,
    Json(input): Json<GradeRequest>,
) -> AppResult<impl IntoResponse> {
    let data = record_grade(&state, &teacher, target_id, input, GradeMode::First).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// POST /api/v1/targets/{id}/regrade
///
/// Replace the grade of an already graded target. The previous feedback is
/// kept as history.
pub async fn regrade(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Path(target_id): Path<DbId>,
    Json(input): Json<GradeRequest>,
) -> AppResult<impl IntoResponse> {
    let data = record_grade(&state, &teacher, target_id, input, GradeMode::Regrade).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

// ---------------------------------------------------------------------------
// Queues
// ---------------------------------------------------------------------------

/// GET /api/v1/grading/inbox
///
/// Submitted targets awaiting a grade, oldest submission first.
pub async fn inbox(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<serde_json::Value>> {
    let (limit, offset) = params.resolve();
    let targets =
        AssignmentTargetRepo::inbox_for_teacher(&state.pool, teacher.user_id, limit, offset)
            .await?;
    Ok(Json(serde_json::json!({ "data": targets })))
}

/// GET /api/v1/grading/graded
pub async fn graded(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<serde_json::Value>> {
    let (limit, offset) = params.resolve();
    let targets =
        AssignmentTargetRepo::graded_for_teacher(&state.pool, teacher.user_id, limit, offset)
            .await?;
    Ok(Json(serde_json::json!({ "data": targets })))
}

/// GET /api/v1/grading/statistics
pub async fn statistics(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let stats = AssignmentTargetRepo::statistics_for_teacher(&state.pool, teacher.user_id).await?;
    Ok(Json(serde_json::json!({ "data": stats })))
}
