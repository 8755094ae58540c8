//! User and invite code models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutor_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub telegram_id: Option<i64>,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub phone: Option<String>,
    pub grade: Option<i32>,
    pub subjects: Option<String>,
    pub invite_code: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Name to show in messages: full name, else `@username`, else `#id`.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }
        match &self.username {
            Some(u) if !u.is_empty() => format!("@{u}"),
            _ => format!("#{}", self.id),
        }
    }
}

/// DTO for inserting a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub telegram_id: Option<i64>,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

/// Profile fields refreshed on every Telegram login.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

/// Fields a guest provides when redeeming an invite code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentRegistration {
    pub phone: Option<String>,
    pub grade: Option<i32>,
    pub subjects: Option<String>,
}

/// A row from the `invite_codes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InviteCode {
    pub id: DbId,
    pub code: String,
    pub teacher_id: DbId,
    pub redeemed_by: Option<DbId>,
    pub redeemed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Result of trying to redeem an invite code.
#[derive(Debug)]
pub enum RedeemOutcome {
    /// The code was claimed and the user is now a student.
    Redeemed(User),
    /// No such code.
    UnknownCode,
    /// Someone already used it.
    AlreadyRedeemed,
    /// The caller is not a guest (already a student or a teacher).
    NotGuest,
}
