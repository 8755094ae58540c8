//! Draft (autosave buffer) model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutor_core::types::{DbId, MediaRef, Timestamp};

/// A row from the `drafts` table. At most one per target.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Draft {
    pub id: DbId,
    pub assignment_target_id: DbId,
    pub student_id: DbId,
    pub text: Option<String>,
    pub media_ids: Vec<MediaRef>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for saving a draft. Overwrites whatever was saved before.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveDraft {
    pub text: Option<String>,
    #[serde(default)]
    pub media_ids: Vec<MediaRef>,
}
