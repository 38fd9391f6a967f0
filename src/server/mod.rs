//! HTTPS server for the conversion webhook
//!
//! Endpoints:
//! - `/convert` - ConversionReview handling (POST)
//! - `/health` - Liveness probe (any method, always `OK`)

mod convert;
mod health;
mod tls;

use axum::extract::DefaultBodyLimit;
use axum::routing::{any, post};
use axum::Router;

pub use convert::convert;
pub use health::health;
pub use tls::{load_tls_config, run_tls_server, ServerError, TlsError};

/// Build the webhook router
///
/// The body limit is lifted: a review may carry a whole list of objects.
pub fn router() -> Router {
    Router::new()
        .route("/convert", post(convert))
        .route("/health", any(health))
        .layer(DefaultBodyLimit::disable())
}

#[cfg(test)]
#[path = "health_test.rs"]
mod health_tests;

#[cfg(test)]
#[path = "convert_test.rs"]
mod convert_tests;

#[cfg(test)]
#[path = "tls_test.rs"]
mod tls_tests;
