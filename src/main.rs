use example_conversion_webhook::server::{load_tls_config, router, run_tls_server};
use example_conversion_webhook::WebhookConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = WebhookConfig::from_env();
    info!(
        cert_file = %config.cert_file.display(),
        key_file = %config.key_file.display(),
        "Starting Example conversion webhook"
    );

    // No TLS material means no webhook: the API server only calls over HTTPS
    let tls_config = match load_tls_config(&config.cert_file, &config.key_file) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to load key pair");
            return Err(e.into());
        }
    };

    if let Err(e) = run_tls_server(config.socket_addr(), tls_config, router()).await {
        error!(error = %e, "Failed to start webhook server");
        return Err(e.into());
    }

    Ok(())
}
