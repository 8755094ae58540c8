//! Handlers for the `/auth` resource: Telegram login, profile, invite
//! codes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tutor_core::error::CoreError;
use tutor_core::invite::{generate_invite_code, normalize_invite_code};
use tutor_core::roles::{ROLE_GUEST, ROLE_STUDENT, ROLE_TEACHER};
use tutor_db::models::user::{CreateUser, RedeemOutcome, StudentRegistration, UpdateProfile, User};
use tutor_db::repositories::{InviteCodeRepo, UserRepo};

use crate::auth::jwt::generate_access_token;
use crate::auth::telegram::TelegramLogin;
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireTeacher;
use crate::response::DataResponse;
use crate::state::AppState;

/// Attempts at drawing an unused invite code before giving up.
const INVITE_CODE_ATTEMPTS: usize = 5;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Successful authentication response returned by login and redemption.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
    /// `true` when this login created the account.
    pub is_new_user: bool,
}

/// Request body for `POST /auth/invite/redeem`.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub code: String,
    #[serde(flatten)]
    pub registration: StudentRegistration,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn issue_token(state: &AppState, user: User, is_new_user: bool) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    Ok(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user,
        is_new_user,
    })
}

/// Load the caller's live user row or fail with 401.
pub async fn current_user(state: &AppState, auth: &AuthUser) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/telegram
///
/// Log in with a Telegram login-widget payload. Unknown Telegram ids are
/// registered as guests, or as teachers when allow-listed.
pub async fn telegram_login(
    State(state): State<AppState>,
    Json(input): Json<TelegramLogin>,
) -> AppResult<Json<AuthResponse>> {
    if let Some(bot_token) = &state.config.telegram_bot_token {
        input
            .verify(bot_token, Utc::now().timestamp())
            .map_err(|e| AppError::Core(CoreError::Unauthorized(e.to_string())))?;
    }

    let profile = UpdateProfile {
        username: input.username.clone(),
        first_name: input.first_name.clone().unwrap_or_default(),
        last_name: input.last_name.clone().unwrap_or_default(),
    };

    if let Some(existing) = UserRepo::find_by_telegram_id(&state.pool, input.id).await? {
        let user = UserRepo::refresh_profile(&state.pool, existing.id, &profile)
            .await?
            .unwrap_or(existing);
        tracing::info!(user_id = user.id, role = %user.role, "User logged in");
        return Ok(Json(issue_token(&state, user, false)?));
    }

    let role = if state.config.is_teacher_telegram_id(input.id) {
        ROLE_TEACHER
    } else {
        ROLE_GUEST
    };
    let create = CreateUser {
        telegram_id: Some(input.id),
        username: profile.username,
        first_name: profile.first_name,
        last_name: profile.last_name,
        role: role.to_string(),
    };

    let (user, is_new_user) = match UserRepo::create(&state.pool, &create).await {
        Ok(user) => (user, true),
        // A concurrent first login won the insert.
        Err(e) if is_unique_violation(&e, "uq_users_telegram_id") => {
            let user = UserRepo::find_by_telegram_id(&state.pool, input.id)
                .await?
                .ok_or(AppError::Database(e))?;
            (user, false)
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, role = %user.role, is_new_user, "User registered");
    Ok(Json(issue_token(&state, user, is_new_user)?))
}

/// GET /api/v1/auth/me
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = current_user(&state, &auth).await?;
    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/auth/invite/redeem
///
/// Redeem an invite code as a guest. Promotes the caller to student and
/// returns a fresh token carrying the new role.
pub async fn redeem_invite(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RedeemRequest>,
) -> AppResult<Json<AuthResponse>> {
    let code = normalize_invite_code(&input.code)?;

    let outcome =
        InviteCodeRepo::redeem(&state.pool, &code, auth.user_id, &input.registration).await?;

    let user = match outcome {
        RedeemOutcome::Redeemed(user) => user,
        RedeemOutcome::UnknownCode => {
            return Err(AppError::NotFound(format!("Invite code '{code}' not found")))
        }
        RedeemOutcome::AlreadyRedeemed => {
            return Err(AppError::Core(CoreError::Conflict(
                "Invite code has already been used".into(),
            )))
        }
        RedeemOutcome::NotGuest => {
            return Err(AppError::Core(CoreError::InvalidState(
                "Only guests can redeem an invite code".into(),
            )))
        }
    };

    tracing::info!(user_id = user.id, "Invite code redeemed");
    Ok(Json(issue_token(&state, user, false)?))
}

/// POST /api/v1/auth/invites
///
/// Issue a new single-use invite code.
pub async fn create_invite(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let mut last_err = None;
    for _ in 0..INVITE_CODE_ATTEMPTS {
        let code = generate_invite_code();
        match InviteCodeRepo::create(&state.pool, teacher.user_id, &code).await {
            Ok(invite) => {
                tracing::info!(
                    teacher_id = teacher.user_id,
                    invite_id = invite.id,
                    "Invite code issued"
                );
                return Ok((StatusCode::CREATED, Json(DataResponse { data: invite })));
            }
            Err(e) if is_unique_violation(&e, "uq_invite_codes_code") => last_err = Some(e),
            Err(e) => return Err(e.into()),
        }
    }
    Err(last_err
        .map(AppError::Database)
        .unwrap_or_else(|| AppError::InternalError("Could not allocate an invite code".into())))
}

/// GET /api/v1/auth/invites
pub async fn list_invites(
    RequireTeacher(teacher): RequireTeacher,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let invites = InviteCodeRepo::list_for_teacher(&state.pool, teacher.user_id).await?;
    Ok(Json(serde_json::json!({ "data": invites })))
}

/// GET /api/v1/auth/students
///
/// Every registered student, for roster building.
pub async fn list_students(
    RequireTeacher(_teacher): RequireTeacher,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let students = UserRepo::list_by_role(&state.pool, ROLE_STUDENT).await?;
    Ok(Json(serde_json::json!({ "data": students })))
}
