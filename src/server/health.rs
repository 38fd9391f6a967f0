//! Liveness endpoint
//!
//! Independent of the conversion path: if this responds, the process is alive.

use axum::http::StatusCode;

/// Liveness probe handler
///
/// Always returns 200 with body `OK`.
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
