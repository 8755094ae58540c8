//! Domain rules for the tutoring backend.
//!
//! Pure functions and constants only: no database, network or runtime
//! dependencies, so both the API server and the scheduled worker share them.

pub mod channels;
pub mod chat;
pub mod coursework;
pub mod error;
pub mod grading;
pub mod invite;
pub mod notifications;
pub mod pagination;
pub mod roles;
pub mod types;
