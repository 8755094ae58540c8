//! Shared query parameter types for API handlers.

use serde::Deserialize;
use tutor_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use tutor_core::types::Timestamp;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` ready to bind.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_LIMIT, MAX_LIMIT),
            clamp_offset(self.offset),
        )
    }
}

/// `?status=` filter for listings of assignments and targets.
#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

/// Cursor parameters for chat history (`?before=&limit=`).
#[derive(Debug, Deserialize)]
pub struct CursorParams {
    pub before: Option<Timestamp>,
    pub limit: Option<i64>,
}
