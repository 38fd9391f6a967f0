//! `/convert` endpoint

use crate::review::{handle_review, ReviewError};
use axum::body::Bytes;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use tracing::warn;

/// Conversion webhook handler
///
/// Returns 200 with the response review as JSON, 400 with the parse error
/// text when the review itself is unreadable, or 500 if the response can't
/// be encoded.
pub async fn convert(body: Bytes) -> Result<impl IntoResponse, ReviewError> {
    let answer = handle_review(&body).inspect_err(|e| {
        warn!(error = %e, status = %e.status_code(), "Rejected conversion review");
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        answer,
    ))
}
