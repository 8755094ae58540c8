//! Repository for the `drafts` table.

use sqlx::PgPool;
use tutor_core::types::DbId;

use crate::models::draft::{Draft, SaveDraft};

/// Column list for `drafts` queries.
const COLUMNS: &str =
    "id, assignment_target_id, student_id, text, media_ids, created_at, updated_at";

/// Provides the one-draft-per-target autosave buffer.
pub struct DraftRepo;

impl DraftRepo {
    /// Insert or replace the draft for a target.
    pub async fn upsert(
        pool: &PgPool,
        target_id: DbId,
        student_id: DbId,
        input: &SaveDraft,
    ) -> Result<Draft, sqlx::Error> {
        let query = format!(
            "INSERT INTO drafts (assignment_target_id, student_id, text, media_ids)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_drafts_target DO UPDATE SET
                text = EXCLUDED.text,
                media_ids = EXCLUDED.media_ids,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Draft>(&query)
            .bind(target_id)
            .bind(student_id)
            .bind(&input.text)
            .bind(&input.media_ids)
            .fetch_one(pool)
            .await
    }

    /// Find the draft for a target.
    pub async fn find_for_target(
        pool: &PgPool,
        target_id: DbId,
    ) -> Result<Option<Draft>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drafts WHERE assignment_target_id = $1");
        sqlx::query_as::<_, Draft>(&query)
            .bind(target_id)
            .fetch_optional(pool)
            .await
    }

    /// Discard the draft for a target. Returns `true` if one existed.
    pub async fn delete_for_target(pool: &PgPool, target_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM drafts WHERE assignment_target_id = $1")
            .bind(target_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
