//! Repository for the `invite_codes` table.

use sqlx::PgPool;
use tutor_core::roles::{ROLE_GUEST, ROLE_STUDENT};
use tutor_core::types::DbId;

use crate::models::user::{InviteCode, RedeemOutcome, StudentRegistration, User};
use crate::repositories::user_repo;

/// Column list for `invite_codes` queries.
const COLUMNS: &str = "id, code, teacher_id, redeemed_by, redeemed_at, created_at";

/// Provides issuing and redemption of invite codes.
pub struct InviteCodeRepo;

impl InviteCodeRepo {
    /// Store a freshly generated code for `teacher_id`.
    ///
    /// A collision surfaces as a `uq_invite_codes_code` violation; callers
    /// retry with a new code.
    pub async fn create(
        pool: &PgPool,
        teacher_id: DbId,
        code: &str,
    ) -> Result<InviteCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO invite_codes (code, teacher_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InviteCode>(&query)
            .bind(code)
            .bind(teacher_id)
            .fetch_one(pool)
            .await
    }

    /// List the codes a teacher has issued, newest first.
    pub async fn list_for_teacher(
        pool: &PgPool,
        teacher_id: DbId,
    ) -> Result<Vec<InviteCode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invite_codes WHERE teacher_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, InviteCode>(&query)
            .bind(teacher_id)
            .fetch_all(pool)
            .await
    }

    /// Claim `code` for `user_id` and promote the user from guest to student.
    ///
    /// Both writes happen in one transaction. The claim is guarded on
    /// `redeemed_by IS NULL` and the promotion on `role = 'guest'`, so two
    /// concurrent redemptions of the same code cannot both succeed.
    pub async fn redeem(
        pool: &PgPool,
        code: &str,
        user_id: DbId,
        registration: &StudentRegistration,
    ) -> Result<RedeemOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let claimed: Option<(DbId,)> = sqlx::query_as(
            "UPDATE invite_codes SET redeemed_by = $2, redeemed_at = NOW() \
             WHERE code = $1 AND redeemed_by IS NULL \
             RETURNING id",
        )
        .bind(code)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if claimed.is_none() {
            let exists: Option<(DbId,)> =
                sqlx::query_as("SELECT id FROM invite_codes WHERE code = $1")
                    .bind(code)
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;
            return Ok(match exists {
                Some(_) => RedeemOutcome::AlreadyRedeemed,
                None => RedeemOutcome::UnknownCode,
            });
        }

        let query = format!(
            "UPDATE users SET
                role = $3,
                invite_code = $2,
                phone = COALESCE($4, phone),
                grade = COALESCE($5, grade),
                subjects = COALESCE($6, subjects)
             WHERE id = $1 AND role = $7 AND deleted_at IS NULL
             RETURNING {}",
            user_repo::COLUMNS
        );
        let promoted = sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(code)
            .bind(ROLE_STUDENT)
            .bind(&registration.phone)
            .bind(registration.grade)
            .bind(&registration.subjects)
            .bind(ROLE_GUEST)
            .fetch_optional(&mut *tx)
            .await?;

        match promoted {
            Some(user) => {
                tx.commit().await?;
                Ok(RedeemOutcome::Redeemed(user))
            }
            None => {
                tx.rollback().await?;
                Ok(RedeemOutcome::NotGuest)
            }
        }
    }
}
