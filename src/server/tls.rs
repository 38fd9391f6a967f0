//! TLS termination for the webhook router
//!
//! The API server only talks HTTPS to conversion webhooks, so there is no
//! plain HTTP listener. Each accepted TCP connection gets its own task that
//! performs the TLS handshake and then serves the axum router over HTTP/1 or
//! HTTP/2.

use axum::Router;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_rustls::rustls::crypto::ring::default_provider;
use tokio_rustls::rustls::pki_types::pem::{self, PemObject};
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::rustls::version::{TLS12, TLS13};
use tokio_rustls::rustls::{self, ServerConfig};
use tokio_rustls::TlsAcceptor;
use tower::ServiceExt;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("failed to read certificates from {}: {source}", path.display())]
    ReadCertificates { path: PathBuf, source: pem::Error },

    #[error("no certificates found in {}", path.display())]
    NoCertificates { path: PathBuf },

    #[error("failed to read private key from {}: {source}", path.display())]
    ReadPrivateKey { path: PathBuf, source: pem::Error },

    #[error("invalid TLS configuration: {0}")]
    Rustls(#[from] rustls::Error),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
}

/// Load a PEM certificate chain and private key into a rustls server config
///
/// Certificates are read once; there is no reload while running.
pub fn load_tls_config(cert_file: &Path, key_file: &Path) -> Result<ServerConfig, TlsError> {
    let certs = CertificateDer::pem_file_iter(cert_file)
        .and_then(|iter| iter.collect::<Result<Vec<_>, _>>())
        .map_err(|source| TlsError::ReadCertificates {
            path: cert_file.to_path_buf(),
            source,
        })?;
    if certs.is_empty() {
        return Err(TlsError::NoCertificates {
            path: cert_file.to_path_buf(),
        });
    }

    let key = PrivateKeyDer::from_pem_file(key_file).map_err(|source| {
        TlsError::ReadPrivateKey {
            path: key_file.to_path_buf(),
            source,
        }
    })?;

    let mut config = ServerConfig::builder_with_provider(Arc::new(default_provider()))
        .with_protocol_versions(&[&TLS12, &TLS13])?
        .with_no_client_auth()
        .with_single_cert(certs, key)?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    debug!(
        cert_file = %cert_file.display(),
        key_file = %key_file.display(),
        "Loaded TLS key pair"
    );
    Ok(config)
}

/// Run the HTTPS server on the given address
///
/// Handshake and connection errors only affect the connection they happen
/// on. This function runs forever unless binding fails.
pub async fn run_tls_server(
    addr: SocketAddr,
    tls_config: ServerConfig,
    router: Router,
) -> Result<(), ServerError> {
    let acceptor = TlsAcceptor::from(Arc::new(tls_config));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    // Log after successful bind - server is actually listening
    info!(%addr, "Webhook server listening");

    loop {
        let (tcp_stream, remote_addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                debug!(error = %e, "Failed to accept TCP connection");
                continue;
            }
        };

        let acceptor = acceptor.clone();
        let router = router.clone();
        tokio::spawn(async move {
            let tls_stream = match acceptor.accept(tcp_stream).await {
                Ok(stream) => stream,
                Err(e) => {
                    debug!(%remote_addr, error = %e, "TLS handshake failed");
                    return;
                }
            };

            // hyper drives the connection; each request goes through the router
            let service =
                service_fn(move |request: Request<Incoming>| router.clone().oneshot(request));

            if let Err(e) = auto::Builder::new(TokioExecutor::new())
                .serve_connection(TokioIo::new(tls_stream), service)
                .await
            {
                warn!(%remote_addr, error = %e, "Failed to serve connection");
            }
        });
    }
}
