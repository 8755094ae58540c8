//! Feedback (grading record) model.

use serde::Serialize;
use sqlx::FromRow;
use tutor_core::types::{DbId, MediaRef, Timestamp};

/// A row from the `feedback` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub id: DbId,
    pub assignment_target_id: DbId,
    pub teacher_id: DbId,
    pub text: String,
    pub score: Option<f64>,
    pub grade: String,
    pub media_ids: Vec<MediaRef>,
    pub created_at: Timestamp,
}

/// Input for recording a grade.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub assignment_target_id: DbId,
    pub teacher_id: DbId,
    pub text: String,
    pub score: Option<f64>,
    pub grade: String,
    pub media_ids: Vec<MediaRef>,
}
