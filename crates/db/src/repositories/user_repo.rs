//! Repository for the `users` table.

use sqlx::PgPool;
use tutor_core::types::DbId;

use crate::models::user::{CreateUser, UpdateProfile, User};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, telegram_id, username, first_name, last_name, role, \
     phone, grade, subjects, invite_code, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Fails with a `uq_users_telegram_id` violation if the Telegram id is
    /// already registered.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (telegram_id, username, first_name, last_name, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.telegram_id)
            .bind(&input.username)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal id. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM live_users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by Telegram id. Excludes soft-deleted rows.
    pub async fn find_by_telegram_id(
        pool: &PgPool,
        telegram_id: i64,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM live_users WHERE telegram_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(telegram_id)
            .fetch_optional(pool)
            .await
    }

    /// Load several users at once. Missing or deleted ids are skipped.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM live_users WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List users with the given role, newest first.
    pub async fn list_by_role(pool: &PgPool, role: &str) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM live_users WHERE role = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(role)
            .fetch_all(pool)
            .await
    }

    /// Refresh the profile fields Telegram sends on every login.
    ///
    /// Returns `None` if no live user with the given `id` exists.
    pub async fn refresh_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = $2,
                first_name = $3,
                last_name = $4
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a user by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
