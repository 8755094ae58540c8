//! Repository for the `submissions` table.

use sqlx::PgPool;
use tutor_core::coursework::{
    next_attempt, ASSIGNMENT_STATUS_ACTIVE, SUBMITTABLE_STATUSES, SUBMISSION_STATUS_SUBMITTED,
    TARGET_STATUS_SUBMITTED,
};
use tutor_core::types::DbId;

use crate::models::assignment_target::AssignmentTarget;
use crate::models::submission::{NewSubmission, Submission};
use crate::repositories::assignment_target_repo;

/// Column list for `submissions` queries.
const COLUMNS: &str = "id, assignment_target_id, student_id, text, media_ids, attempt, \
     is_late, status, grade, teacher_comment, submitted_at, updated_at";

/// Provides submission writes and history reads.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Record a new attempt for a target.
    ///
    /// In one transaction: moves the target to `submitted` (guarded on a
    /// submittable status and an active, live assignment), numbers the
    /// attempt as prior count + 1, inserts the submission and clears the
    /// draft. The guarded update locks the target row, so concurrent
    /// submissions of the same target are serialized and cannot reuse an
    /// attempt number.
    ///
    /// Returns `None` when the guard fails (target missing, graded, or its
    /// assignment archived or deleted).
    pub async fn submit(
        pool: &PgPool,
        input: &NewSubmission,
    ) -> Result<Option<(Submission, AssignmentTarget)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE assignment_targets SET
                status = $2,
                submitted_at = $3,
                is_late = is_late OR $4
             WHERE id = $1
               AND student_id = $5
               AND status = ANY($6)
               AND assignment_id IN (
                   SELECT id FROM live_assignments WHERE status = $7
               )
             RETURNING {}",
            assignment_target_repo::COLUMNS
        );
        let target = sqlx::query_as::<_, AssignmentTarget>(&query)
            .bind(input.assignment_target_id)
            .bind(TARGET_STATUS_SUBMITTED)
            .bind(input.submitted_at)
            .bind(input.is_late)
            .bind(input.student_id)
            .bind(SUBMITTABLE_STATUSES)
            .bind(ASSIGNMENT_STATUS_ACTIVE)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(target) = target else {
            tx.rollback().await?;
            return Ok(None);
        };

        let prior: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM submissions WHERE assignment_target_id = $1")
                .bind(target.id)
                .fetch_one(&mut *tx)
                .await?;

        let query = format!(
            "INSERT INTO submissions
                (assignment_target_id, student_id, text, media_ids, attempt,
                 is_late, status, submitted_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let submission = sqlx::query_as::<_, Submission>(&query)
            .bind(target.id)
            .bind(input.student_id)
            .bind(&input.text)
            .bind(&input.media_ids)
            .bind(next_attempt(prior))
            .bind(input.is_late)
            .bind(SUBMISSION_STATUS_SUBMITTED)
            .bind(input.submitted_at)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM drafts WHERE assignment_target_id = $1")
            .bind(target.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((submission, target)))
    }

    /// List every attempt for a target, oldest first.
    pub async fn list_for_target(
        pool: &PgPool,
        target_id: DbId,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submissions
             WHERE assignment_target_id = $1
             ORDER BY attempt"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(target_id)
            .fetch_all(pool)
            .await
    }

    /// The highest-numbered attempt for a target, if any.
    pub async fn latest_for_target(
        pool: &PgPool,
        target_id: DbId,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submissions
             WHERE assignment_target_id = $1
             ORDER BY attempt DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(target_id)
            .fetch_optional(pool)
            .await
    }
}
