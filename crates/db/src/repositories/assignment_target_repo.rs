//! Repository for the `assignment_targets` table.
//!
//! A target is one student's copy of an assignment and carries the state
//! machine. Every status change here is a single conditional `UPDATE`.

use sqlx::{PgConnection, PgPool};
use tutor_core::coursework::{
    ASSIGNMENT_STATUS_ACTIVE, TARGET_STATUS_GRADED, TARGET_STATUS_OVERDUE, TARGET_STATUS_PENDING,
    TARGET_STATUS_SUBMITTED,
};
use tutor_core::types::{DbId, Timestamp};

use crate::models::assignment_target::{
    AssignmentTarget, DueTarget, TargetWithAssignment, TargetWithStudent, TeacherStatistics,
};

/// Column list for `assignment_targets` queries.
pub(crate) const COLUMNS: &str = "id, assignment_id, student_id, status, score, submitted_at, \
     graded_at, is_late, reminder_sent_at, created_at, updated_at";

/// Projection joining a target to its assignment.
const WITH_ASSIGNMENT: &str = "SELECT t.id, t.assignment_id, t.student_id, t.status, t.score,
            t.submitted_at, t.graded_at, t.is_late,
            a.title, a.description, a.subject, a.due_date, a.teacher_id, a.group_id,
            a.status AS assignment_status
     FROM live_assignment_targets t
     JOIN live_assignments a ON a.id = t.assignment_id";

/// Projection joining a target to its assignment and student.
const WITH_STUDENT: &str = "SELECT t.id, t.assignment_id, a.title AS assignment_title, a.due_date,
            t.student_id, u.first_name, u.last_name, u.username,
            t.status, t.score, t.submitted_at, t.graded_at, t.is_late
     FROM live_assignment_targets t
     JOIN live_assignments a ON a.id = t.assignment_id
     JOIN users u ON u.id = t.student_id";

/// Provides reads and guarded transitions for assignment targets.
pub struct AssignmentTargetRepo;

impl AssignmentTargetRepo {
    /// Insert one `pending` target per student using `UNNEST`.
    ///
    /// Runs on the caller's connection so it joins the assignment insert's
    /// transaction.
    pub async fn insert_batch(
        conn: &mut PgConnection,
        assignment_id: DbId,
        student_ids: &[DbId],
    ) -> Result<Vec<AssignmentTarget>, sqlx::Error> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "INSERT INTO assignment_targets (assignment_id, student_id, status)
             SELECT $1, sid, $3 FROM UNNEST($2::bigint[]) AS sid
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssignmentTarget>(&query)
            .bind(assignment_id)
            .bind(student_ids)
            .bind(TARGET_STATUS_PENDING)
            .fetch_all(&mut *conn)
            .await
    }

    /// Find a target by ID. Targets of deleted assignments are excluded.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssignmentTarget>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM live_assignment_targets WHERE id = $1");
        sqlx::query_as::<_, AssignmentTarget>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a target together with its assignment.
    pub async fn find_with_assignment(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TargetWithAssignment>, sqlx::Error> {
        let query = format!("{WITH_ASSIGNMENT} WHERE t.id = $1");
        sqlx::query_as::<_, TargetWithAssignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every target of an assignment with student names.
    pub async fn list_for_assignment(
        pool: &PgPool,
        assignment_id: DbId,
    ) -> Result<Vec<TargetWithStudent>, sqlx::Error> {
        let query = format!(
            "{WITH_STUDENT} WHERE t.assignment_id = $1 ORDER BY u.last_name, u.first_name, t.id"
        );
        sqlx::query_as::<_, TargetWithStudent>(&query)
            .bind(assignment_id)
            .fetch_all(pool)
            .await
    }

    /// List a student's targets, nearest due date first.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<TargetWithAssignment>, sqlx::Error> {
        let query = format!(
            "{WITH_ASSIGNMENT}
             WHERE t.student_id = $1 AND ($2::text IS NULL OR t.status = $2)
             ORDER BY a.due_date, t.id"
        );
        sqlx::query_as::<_, TargetWithAssignment>(&query)
            .bind(student_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// The teacher's review inbox: submitted targets, oldest submission
    /// first.
    pub async fn inbox_for_teacher(
        pool: &PgPool,
        teacher_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TargetWithStudent>, sqlx::Error> {
        let query = format!(
            "{WITH_STUDENT}
             WHERE a.teacher_id = $1 AND t.status = $2
             ORDER BY t.submitted_at, t.id
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, TargetWithStudent>(&query)
            .bind(teacher_id)
            .bind(TARGET_STATUS_SUBMITTED)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Graded targets of a teacher's assignments, most recently graded
    /// first.
    pub async fn graded_for_teacher(
        pool: &PgPool,
        teacher_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TargetWithStudent>, sqlx::Error> {
        let query = format!(
            "{WITH_STUDENT}
             WHERE a.teacher_id = $1 AND t.status = $2
             ORDER BY t.graded_at DESC, t.id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, TargetWithStudent>(&query)
            .bind(teacher_id)
            .bind(TARGET_STATUS_GRADED)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Aggregate target counts and the average score over a teacher's
    /// live assignments.
    pub async fn statistics_for_teacher(
        pool: &PgPool,
        teacher_id: DbId,
    ) -> Result<TeacherStatistics, sqlx::Error> {
        sqlx::query_as::<_, TeacherStatistics>(
            "SELECT
                (SELECT COUNT(*) FROM live_assignments
                  WHERE teacher_id = $1 AND status = $2) AS active_assignments,
                COUNT(t.id) FILTER (WHERE t.status = $3) AS pending,
                COUNT(t.id) FILTER (WHERE t.status = $4) AS submitted,
                COUNT(t.id) FILTER (WHERE t.status = $5) AS graded,
                COUNT(t.id) FILTER (WHERE t.status = $6) AS overdue,
                COUNT(t.id) FILTER (WHERE t.is_late) AS late_submissions,
                AVG(t.score) FILTER (WHERE t.status = $5) AS average_score
             FROM live_assignment_targets t
             JOIN live_assignments a ON a.id = t.assignment_id
             WHERE a.teacher_id = $1",
        )
        .bind(teacher_id)
        .bind(ASSIGNMENT_STATUS_ACTIVE)
        .bind(TARGET_STATUS_PENDING)
        .bind(TARGET_STATUS_SUBMITTED)
        .bind(TARGET_STATUS_GRADED)
        .bind(TARGET_STATUS_OVERDUE)
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Scheduled transitions
    // -----------------------------------------------------------------------

    /// Flip every `pending` target whose assignment is past due to
    /// `overdue`, returning exactly the rows that changed.
    ///
    /// Safe to run concurrently with submissions: a target that is
    /// submitted first no longer matches `status = 'pending'`.
    pub async fn mark_overdue(pool: &PgPool, now: Timestamp) -> Result<Vec<DueTarget>, sqlx::Error> {
        sqlx::query_as::<_, DueTarget>(
            "UPDATE assignment_targets t SET status = $2
             FROM live_assignments a
             WHERE a.id = t.assignment_id
               AND t.status = $3
               AND a.due_date < $1
             RETURNING t.id AS target_id, t.assignment_id, t.student_id, a.title, a.due_date",
        )
        .bind(now)
        .bind(TARGET_STATUS_OVERDUE)
        .bind(TARGET_STATUS_PENDING)
        .fetch_all(pool)
        .await
    }

    /// Stamp `reminder_sent_at` on pending targets of active assignments due
    /// within `(now, window_end]` that have not been reminded yet.
    ///
    /// Returns the claimed rows; each target is claimed at most once.
    pub async fn claim_reminders(
        pool: &PgPool,
        now: Timestamp,
        window_end: Timestamp,
    ) -> Result<Vec<DueTarget>, sqlx::Error> {
        sqlx::query_as::<_, DueTarget>(
            "UPDATE assignment_targets t SET reminder_sent_at = $1
             FROM live_assignments a
             WHERE a.id = t.assignment_id
               AND t.status = $3
               AND t.reminder_sent_at IS NULL
               AND a.status = $4
               AND a.due_date > $1
               AND a.due_date <= $2
             RETURNING t.id AS target_id, t.assignment_id, t.student_id, a.title, a.due_date",
        )
        .bind(now)
        .bind(window_end)
        .bind(TARGET_STATUS_PENDING)
        .bind(ASSIGNMENT_STATUS_ACTIVE)
        .fetch_all(pool)
        .await
    }
}
