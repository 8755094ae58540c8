//! Bearer-token identity for handlers.
//!
//! The token carries the user id and the role at login time. A guest who
//! redeems an invite gets a fresh token with the new role.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tutor_core::error::CoreError;
use tutor_core::roles::{ROLE_STUDENT, ROLE_TEACHER};
use tutor_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller, as stated by a valid access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// `guest`, `student` or `teacher`.
    pub role: String,
}

impl AuthUser {
    pub fn is_teacher(&self) -> bool {
        self.role == ROLE_TEACHER
    }

    pub fn is_student(&self) -> bool {
        self.role == ROLE_STUDENT
    }

    /// Students and teachers. Guests have not redeemed an invite yet.
    pub fn is_member(&self) -> bool {
        self.is_student() || self.is_teacher()
    }
}

/// The token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str, CoreError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| CoreError::Unauthorized("Expected a Bearer token".into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use tutor_core::roles::ROLE_GUEST;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/auth/me");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_is_extracted() {
        let parts = parts_with(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_or_malformed_header_is_unauthorized() {
        for header in [None, Some("Basic dXNlcg=="), Some("Bearer "), Some("abc.def.ghi")] {
            let parts = parts_with(header);
            assert!(
                matches!(bearer_token(&parts), Err(CoreError::Unauthorized(_))),
                "header {header:?} should be rejected"
            );
        }
    }

    #[test]
    fn guests_are_not_members() {
        let user = |role: &str| AuthUser {
            user_id: 1,
            role: role.to_string(),
        };
        assert!(user(ROLE_TEACHER).is_member());
        assert!(user(ROLE_STUDENT).is_member());
        assert!(!user(ROLE_GUEST).is_member());
        assert!(!user(ROLE_GUEST).is_teacher());
    }
}
