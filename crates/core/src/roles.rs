//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in
//! `20260301000001_create_users.sql`.

pub const ROLE_GUEST: &str = "guest";
pub const ROLE_STUDENT: &str = "student";
pub const ROLE_TEACHER: &str = "teacher";

/// All valid user roles.
pub const VALID_ROLES: &[&str] = &[ROLE_GUEST, ROLE_STUDENT, ROLE_TEACHER];

/// Returns `true` if `role` is one of [`VALID_ROLES`].
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_are_valid() {
        assert!(is_valid_role("guest"));
        assert!(is_valid_role("student"));
        assert!(is_valid_role("teacher"));
    }

    #[test]
    fn admin_is_not_a_role_here() {
        assert!(!is_valid_role("admin"));
        assert!(!is_valid_role(""));
    }
}
