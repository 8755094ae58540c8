//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers check ownership, call the repositories in `tutor_db` and map
//! errors via [`AppError`](crate::error::AppError). Notifications are
//! enqueued after the state change commits and never fail the request.

pub mod assignment;
pub mod auth;
pub mod chat;
pub mod grading;
pub mod group;
pub mod notification;
pub mod target;
