//! Shared response envelope types for API handlers.
//!
//! Successful responses are wrapped as `{ "data": ... }`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
