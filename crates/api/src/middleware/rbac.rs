//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! match. Ownership checks (this teacher's group, this student's target) are
//! left to the handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tutor_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `teacher` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn teacher_only(RequireTeacher(user): RequireTeacher) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireTeacher(pub AuthUser);

impl FromRequestParts<AppState> for RequireTeacher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_teacher() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Teacher role required".into(),
            )));
        }
        Ok(RequireTeacher(user))
    }
}

/// Requires the `student` role. Guests must redeem an invite code first.
pub struct RequireStudent(pub AuthUser);

impl FromRequestParts<AppState> for RequireStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_student() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Student role required".into(),
            )));
        }
        Ok(RequireStudent(user))
    }
}

/// Requires a registered user: a student or a teacher, not a guest.
pub struct RequireMember(pub AuthUser);

impl FromRequestParts<AppState> for RequireMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_member() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Redeem an invite code first".into(),
            )));
        }
        Ok(RequireMember(user))
    }
}
