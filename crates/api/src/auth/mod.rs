//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`telegram`] -- Telegram login-widget signature verification.

pub mod jwt;
pub mod telegram;
