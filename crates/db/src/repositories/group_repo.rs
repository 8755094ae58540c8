//! Repository for the `groups` and `group_members` tables.

use sqlx::PgPool;
use tutor_core::coursework::GROUP_ROLE_STUDENT;
use tutor_core::types::DbId;

use crate::models::group::{CreateGroup, Group, GroupMember, GroupMemberWithUser, UpdateGroup};

/// Column list for `groups` queries.
const COLUMNS: &str = "id, name, subject, grade, level, teacher_id, created_at, updated_at";

/// Column list for `group_members` queries.
const MEMBER_COLUMNS: &str = "id, group_id, user_id, role, joined_at";

/// Provides CRUD operations for groups and their rosters.
pub struct GroupRepo;

impl GroupRepo {
    /// Insert a new group owned by `teacher_id`.
    pub async fn create(
        pool: &PgPool,
        teacher_id: DbId,
        input: &CreateGroup,
    ) -> Result<Group, sqlx::Error> {
        let query = format!(
            "INSERT INTO groups (name, subject, grade, level, teacher_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(&input.name)
            .bind(&input.subject)
            .bind(input.grade)
            .bind(input.level)
            .bind(teacher_id)
            .fetch_one(pool)
            .await
    }

    /// Find a group by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM live_groups WHERE id = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the groups a teacher owns, by name.
    pub async fn list_for_teacher(
        pool: &PgPool,
        teacher_id: DbId,
    ) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM live_groups WHERE teacher_id = $1 ORDER BY name, id"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(teacher_id)
            .fetch_all(pool)
            .await
    }

    /// List the groups a user belongs to, by name.
    pub async fn list_for_member(pool: &PgPool, user_id: DbId) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM live_groups
             WHERE id IN (SELECT group_id FROM group_members WHERE user_id = $1)
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a group. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGroup,
    ) -> Result<Option<Group>, sqlx::Error> {
        let query = format!(
            "UPDATE groups SET
                name = COALESCE($2, name),
                subject = COALESCE($3, subject),
                grade = COALESCE($4, grade),
                level = COALESCE($5, level)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.subject)
            .bind(input.grade)
            .bind(input.level)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a group by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE groups SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    /// Add a member. A duplicate surfaces as `uq_group_members_group_user`.
    pub async fn add_member(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
        role: &str,
    ) -> Result<GroupMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO group_members (group_id, user_id, role)
             VALUES ($1, $2, $3)
             RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, GroupMember>(&query)
            .bind(group_id)
            .bind(user_id)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// Remove a member. Returns `true` if a membership row was deleted.
    pub async fn remove_member(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the roster with member profiles, in join order.
    pub async fn list_members(
        pool: &PgPool,
        group_id: DbId,
    ) -> Result<Vec<GroupMemberWithUser>, sqlx::Error> {
        sqlx::query_as::<_, GroupMemberWithUser>(
            "SELECT gm.group_id, gm.user_id, gm.role, gm.joined_at,
                    u.username, u.first_name, u.last_name, u.telegram_id
             FROM group_members gm
             JOIN live_users u ON u.id = gm.user_id
             WHERE gm.group_id = $1
             ORDER BY gm.joined_at, gm.id",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }

    /// Ids of every live member regardless of role. This is the snapshot a
    /// group assignment is distributed to.
    pub async fn member_ids(pool: &PgPool, group_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT gm.user_id
             FROM group_members gm
             JOIN live_users u ON u.id = gm.user_id
             WHERE gm.group_id = $1
             ORDER BY gm.user_id",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }

    /// Whether `user_id` is on the roster of `group_id`.
    pub async fn is_member(pool: &PgPool, group_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM group_members WHERE group_id = $1 AND user_id = $2)",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
