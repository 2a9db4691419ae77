//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope per project
//! conventions; mutations that carry no payload return a
//! [`MessageResponse`] instead.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Human-readable confirmation for mutations with no payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
