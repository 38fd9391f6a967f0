//! Process configuration read from the environment at startup

use std::net::SocketAddr;
use std::path::PathBuf;

/// Env var naming the PEM certificate chain
pub const CERT_FILE_ENV: &str = "TLS_CERT_FILE";

/// Env var naming the PEM private key
pub const KEY_FILE_ENV: &str = "TLS_PRIVATE_KEY_FILE";

pub const DEFAULT_CERT_FILE: &str = "/etc/certs/tls.crt";
pub const DEFAULT_KEY_FILE: &str = "/etc/certs/tls.key";

/// HTTPS port the API server is pointed at
pub const WEBHOOK_PORT: u16 = 8443;

/// Webhook server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
    pub port: u16,
}

impl WebhookConfig {
    /// Create config from environment variables
    ///
    /// Uses:
    /// - `TLS_CERT_FILE` for the certificate (falls back to `/etc/certs/tls.crt`)
    /// - `TLS_PRIVATE_KEY_FILE` for the key (falls back to `/etc/certs/tls.key`)
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(CERT_FILE_ENV).ok(),
            std::env::var(KEY_FILE_ENV).ok(),
        )
    }

    /// Build config from already-read values; empty strings count as unset
    pub fn from_vars(cert_file: Option<String>, key_file: Option<String>) -> Self {
        Self {
            cert_file: non_empty(cert_file).unwrap_or_else(|| DEFAULT_CERT_FILE.into()),
            key_file: non_empty(key_file).unwrap_or_else(|| DEFAULT_KEY_FILE.into()),
            port: WEBHOOK_PORT,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn non_empty(value: Option<String>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
