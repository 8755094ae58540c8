//! Per-student assignment target models and read projections.

use serde::Serialize;
use sqlx::FromRow;
use tutor_core::types::{DbId, Timestamp};

/// A row from the `assignment_targets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentTarget {
    pub id: DbId,
    pub assignment_id: DbId,
    pub student_id: DbId,
    pub status: String,
    pub score: Option<f64>,
    pub submitted_at: Option<Timestamp>,
    pub graded_at: Option<Timestamp>,
    pub is_late: bool,
    pub reminder_sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A target joined with its assignment. What a student sees.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TargetWithAssignment {
    pub id: DbId,
    pub assignment_id: DbId,
    pub student_id: DbId,
    pub status: String,
    pub score: Option<f64>,
    pub submitted_at: Option<Timestamp>,
    pub graded_at: Option<Timestamp>,
    pub is_late: bool,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub due_date: Timestamp,
    pub teacher_id: DbId,
    pub group_id: Option<DbId>,
    pub assignment_status: String,
}

/// A target joined with the student's profile. What a teacher sees per
/// assignment and in the inbox.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TargetWithStudent {
    pub id: DbId,
    pub assignment_id: DbId,
    pub assignment_title: String,
    pub due_date: Timestamp,
    pub student_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub username: Option<String>,
    pub status: String,
    pub score: Option<f64>,
    pub submitted_at: Option<Timestamp>,
    pub graded_at: Option<Timestamp>,
    pub is_late: bool,
}

/// Target returned by the overdue sweep and the reminder pass.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DueTarget {
    pub target_id: DbId,
    pub assignment_id: DbId,
    pub student_id: DbId,
    pub title: String,
    pub due_date: Timestamp,
}

/// Aggregate numbers for a teacher's dashboard.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct TeacherStatistics {
    pub active_assignments: i64,
    pub pending: i64,
    pub submitted: i64,
    pub graded: i64,
    pub overdue: i64,
    pub late_submissions: i64,
    pub average_score: Option<f64>,
}
