//! Submission model.

use serde::Serialize;
use sqlx::FromRow;
use tutor_core::types::{DbId, MediaRef, Timestamp};

/// A row from the `submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub assignment_target_id: DbId,
    pub student_id: DbId,
    pub text: Option<String>,
    pub media_ids: Vec<MediaRef>,
    pub attempt: i32,
    pub is_late: bool,
    pub status: String,
    pub grade: Option<String>,
    pub teacher_comment: Option<String>,
    pub submitted_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for recording a hand-in. Lateness is decided by the caller.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_target_id: DbId,
    pub student_id: DbId,
    pub text: Option<String>,
    pub media_ids: Vec<MediaRef>,
    pub is_late: bool,
    pub submitted_at: Timestamp,
}
