//! Group and roster models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutor_core::types::{DbId, Timestamp};

/// A row from the `groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    pub subject: Option<String>,
    pub grade: Option<i32>,
    pub level: Option<i32>,
    pub teacher_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a group. The owning teacher comes from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    pub subject: Option<String>,
    pub grade: Option<i32>,
    pub level: Option<i32>,
}

/// DTO for updating a group. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroup {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<i32>,
    pub level: Option<i32>,
}

/// A row from the `group_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupMember {
    pub id: DbId,
    pub group_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub joined_at: Timestamp,
}

/// A roster entry joined with the member's profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupMemberWithUser {
    pub group_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub joined_at: Timestamp,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub telegram_id: Option<i64>,
}
