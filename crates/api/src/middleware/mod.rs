//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireTeacher`] -- Requires the `teacher` role.
//! - [`rbac::RequireStudent`] -- Requires the `student` role.
//! - [`rbac::RequireMember`] -- Requires a student or a teacher.

pub mod auth;
pub mod rbac;
