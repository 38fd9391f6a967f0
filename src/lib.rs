pub mod config;
pub mod crd;
pub mod review;
pub mod server;

// Re-export for main.rs and integration tests
pub use crate::config::WebhookConfig;
pub use crate::review::{handle_review, ReviewError};
