//! Repository for the `feedback` table.

use sqlx::PgPool;
use tutor_core::coursework::{SUBMISSION_STATUS_REVIEWED, TARGET_STATUS_GRADED};
use tutor_core::types::DbId;

use crate::models::assignment_target::AssignmentTarget;
use crate::models::feedback::{Feedback, NewFeedback};
use crate::repositories::assignment_target_repo;

/// Column list for `feedback` queries.
const COLUMNS: &str =
    "id, assignment_target_id, teacher_id, text, score, grade, media_ids, created_at";

/// Provides grading writes and feedback history reads.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Grade a target whose current status is `expected_status`.
    ///
    /// In one transaction: moves the target to `graded` with the new score,
    /// appends a feedback row and mirrors the grade onto the latest
    /// submission. Returns `None` when the target is missing, belongs to a
    /// deleted assignment, or is no longer in `expected_status`.
    pub async fn record_grade(
        pool: &PgPool,
        input: &NewFeedback,
        expected_status: &str,
    ) -> Result<Option<(Feedback, AssignmentTarget)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE assignment_targets SET
                status = $2,
                score = $3,
                graded_at = NOW()
             WHERE id = $1
               AND status = $4
               AND assignment_id IN (SELECT id FROM live_assignments)
             RETURNING {}",
            assignment_target_repo::COLUMNS
        );
        let target = sqlx::query_as::<_, AssignmentTarget>(&query)
            .bind(input.assignment_target_id)
            .bind(TARGET_STATUS_GRADED)
            .bind(input.score)
            .bind(expected_status)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(target) = target else {
            tx.rollback().await?;
            return Ok(None);
        };

        let query = format!(
            "INSERT INTO feedback (assignment_target_id, teacher_id, text, score, grade, media_ids)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let feedback = sqlx::query_as::<_, Feedback>(&query)
            .bind(target.id)
            .bind(input.teacher_id)
            .bind(&input.text)
            .bind(input.score)
            .bind(&input.grade)
            .bind(&input.media_ids)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE submissions SET
                status = $2,
                grade = $3,
                teacher_comment = NULLIF($4, '')
             WHERE id = (
                 SELECT id FROM submissions
                 WHERE assignment_target_id = $1
                 ORDER BY attempt DESC
                 LIMIT 1
             )",
        )
        .bind(target.id)
        .bind(SUBMISSION_STATUS_REVIEWED)
        .bind(&input.grade)
        .bind(&input.text)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some((feedback, target)))
    }

    /// Feedback history for a target, newest first.
    pub async fn list_for_target(
        pool: &PgPool,
        target_id: DbId,
    ) -> Result<Vec<Feedback>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feedback
             WHERE assignment_target_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(target_id)
            .fetch_all(pool)
            .await
    }
}
