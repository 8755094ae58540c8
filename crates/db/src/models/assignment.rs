//! Assignment model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutor_core::types::{DbId, Timestamp};

/// A row from the `assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assignment {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<i32>,
    pub level: Option<i32>,
    pub teacher_id: DbId,
    pub group_id: Option<DbId>,
    pub student_id: Option<DbId>,
    pub due_date: Timestamp,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an assignment. Exactly one of `group_id` / `student_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignment {
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<i32>,
    pub level: Option<i32>,
    pub group_id: Option<DbId>,
    pub student_id: Option<DbId>,
    pub due_date: Timestamp,
}

/// DTO for updating an assignment. Audience cannot change after creation.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAssignment {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<i32>,
    pub level: Option<i32>,
    pub due_date: Option<Timestamp>,
}
