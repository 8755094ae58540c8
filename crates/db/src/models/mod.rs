//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and patches where the API accepts them

pub mod assignment;
pub mod assignment_target;
pub mod chat;
pub mod draft;
pub mod feedback;
pub mod group;
pub mod notification;
pub mod submission;
pub mod user;
