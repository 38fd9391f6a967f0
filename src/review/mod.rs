//! ConversionReview wire envelope
//!
//! The API server POSTs a review carrying `request`; we answer with the same
//! review type carrying `response` instead. Objects are kept as raw JSON so
//! anything we don't convert goes back exactly as it arrived.

use crate::crd::conversion::convert_object;
use crate::crd::example::null_as_default;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use thiserror::Error;
use tracing::{debug, warn};

/// Result status reported for every answered review
pub const STATUS_SUCCESS: &str = "Success";

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("{0}")]
    Decode(#[source] serde_json::Error),

    #[error("conversion review has no request")]
    MissingRequest,

    #[error("{0}")]
    Encode(#[source] serde_json::Error),
}

impl ReviewError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReviewError::Decode(_) | ReviewError::MissingRequest => StatusCode::BAD_REQUEST,
            ReviewError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Incoming review as sent by the API server
#[derive(Debug, Deserialize)]
pub struct ConversionReviewRequest {
    #[serde(rename = "apiVersion", default)]
    pub api_version: Option<String>,

    #[serde(default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub request: Option<ConversionRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ConversionRequest {
    /// Correlation id, echoed in the response
    #[serde(default)]
    pub uid: String,

    #[serde(rename = "desiredAPIVersion", default)]
    pub desired_api_version: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub objects: Vec<Box<RawValue>>,
}

/// Outgoing review; `request` is never echoed back
#[derive(Debug, Serialize)]
pub struct ConversionReviewResponse {
    #[serde(rename = "apiVersion", skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    pub response: ConversionResponse,
}

#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub uid: String,

    pub result: ConversionResult,

    #[serde(rename = "convertedObjects")]
    pub converted_objects: Vec<Box<RawValue>>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub status: String,
}

impl ConversionResult {
    pub fn success() -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
        }
    }
}

/// Convert every object in the request to its desired version
///
/// Objects that fail to parse or convert are logged and left out; the rest
/// keep their relative order. The result is reported as a success either way.
pub fn convert_request(request: ConversionRequest) -> ConversionResponse {
    let total = request.objects.len();
    let desired = request.desired_api_version.as_str();
    let uid = request.uid.as_str();

    let converted_objects: Vec<Box<RawValue>> = request
        .objects
        .into_iter()
        .enumerate()
        .filter_map(|(index, object)| match convert_object(object, desired) {
            Ok(converted) => Some(converted),
            Err(e) => {
                warn!(uid = %uid, index, error = %e, "Dropping object that failed conversion");
                None
            }
        })
        .collect();

    debug!(
        uid = %uid,
        desired_api_version = %desired,
        total,
        converted = converted_objects.len(),
        "Conversion request processed"
    );

    ConversionResponse {
        uid: request.uid,
        result: ConversionResult::success(),
        converted_objects,
    }
}

/// Answer a serialized ConversionReview with a serialized ConversionReview
pub fn handle_review(body: &[u8]) -> Result<Vec<u8>, ReviewError> {
    let review: ConversionReviewRequest =
        serde_json::from_slice(body).map_err(ReviewError::Decode)?;
    let request = review.request.ok_or(ReviewError::MissingRequest)?;

    let answer = ConversionReviewResponse {
        api_version: review.api_version,
        kind: review.kind,
        response: convert_request(request),
    };

    serde_json::to_vec(&answer).map_err(ReviewError::Encode)
}

#[cfg(test)]
#[path = "review_test.rs"]
mod tests;
