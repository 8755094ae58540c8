//! Repository for the `assignments` table.

use sqlx::PgPool;
use tutor_core::coursework::{ASSIGNMENT_STATUS_ACTIVE, ASSIGNMENT_STATUS_ARCHIVED};
use tutor_core::types::DbId;

use crate::models::assignment::{Assignment, CreateAssignment, UpdateAssignment};
use crate::models::assignment_target::AssignmentTarget;
use crate::repositories::AssignmentTargetRepo;

/// Column list for `assignments` queries.
const COLUMNS: &str = "id, title, description, subject, grade, level, teacher_id, \
     group_id, student_id, due_date, status, created_at, updated_at";

/// Provides CRUD operations for assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert an assignment and one target per student in a single
    /// transaction.
    ///
    /// Either the assignment and every target exist afterwards, or none of
    /// them do. `student_ids` must already be deduplicated.
    pub async fn create_with_targets(
        pool: &PgPool,
        teacher_id: DbId,
        input: &CreateAssignment,
        student_ids: &[DbId],
    ) -> Result<(Assignment, Vec<AssignmentTarget>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO assignments
                (title, description, subject, grade, level, teacher_id,
                 group_id, student_id, due_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let assignment = sqlx::query_as::<_, Assignment>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.subject)
            .bind(input.grade)
            .bind(input.level)
            .bind(teacher_id)
            .bind(input.group_id)
            .bind(input.student_id)
            .bind(input.due_date)
            .bind(ASSIGNMENT_STATUS_ACTIVE)
            .fetch_one(&mut *tx)
            .await?;

        let targets =
            AssignmentTargetRepo::insert_batch(&mut *tx, assignment.id, student_ids).await?;

        tx.commit().await?;
        Ok((assignment, targets))
    }

    /// Find an assignment by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM live_assignments WHERE id = $1");
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a teacher's assignments, nearest due date first.
    ///
    /// When `status` is `Some`, only assignments in that status are returned.
    pub async fn list_for_teacher(
        pool: &PgPool,
        teacher_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Assignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM live_assignments
             WHERE teacher_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY due_date, id"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(teacher_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Update an assignment. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAssignment,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!(
            "UPDATE assignments SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                subject = COALESCE($4, subject),
                grade = COALESCE($5, grade),
                level = COALESCE($6, level),
                due_date = COALESCE($7, due_date)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.subject)
            .bind(input.grade)
            .bind(input.level)
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
    }

    /// Move an active assignment to `archived`.
    ///
    /// Returns `None` if the assignment does not exist or is already archived.
    pub async fn archive(pool: &PgPool, id: DbId) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!(
            "UPDATE assignments SET status = $2
             WHERE id = $1 AND status = $3 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .bind(ASSIGNMENT_STATUS_ARCHIVED)
            .bind(ASSIGNMENT_STATUS_ACTIVE)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an assignment by ID. Its targets drop out of every
    /// `live_assignment_targets` read at the same moment.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE assignments SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
