//! HTTP/HTTPS server startup logic.

use std::net::SocketAddr;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;

use crate::config::{AppConfig, TlsMode};

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    Address(String),

    #[error("Failed to load TLS configuration: {0}")]
    TlsConfig(String),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Start the HTTP/HTTPS server based on configuration.
///
/// Returns once the server has shut down.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .map_err(|e| ServerError::Address(format!("{}:{}: {}", config.http.host, config.http.port, e)))?;

    let handle = Handle::new();
    shutdown::setup_shutdown_handler(handle.clone());

    match (&config.http.tls.mode, &config.http.tls.cert_path, &config.http.tls.key_path) {
        (TlsMode::None, _, _) => {
            tracing::info!(%addr, "Starting HTTP server (no TLS)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        (TlsMode::Manual, Some(cert_path), Some(key_path)) => {
            tracing::info!(%addr, cert = %cert_path, key = %key_path, "Starting HTTPS server");

            // reqwest pulls in ring as well, so rustls cannot pick a provider on its own
            if rustls::crypto::aws_lc_rs::default_provider()
                .install_default()
                .is_err()
            {
                tracing::debug!("Crypto provider already installed");
            }

            let rustls_config = RustlsConfig::from_pem_file(cert_path, key_path)
                .await
                .map_err(|e| ServerError::TlsConfig(format!("Failed to load certificates: {}", e)))?;

            shutdown::setup_reload_handler(rustls_config.clone(), cert_path.clone(), key_path.clone());

            axum_server::bind_rustls(addr, rustls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        (TlsMode::Manual, _, _) => {
            return Err(ServerError::TlsConfig(
                "manual TLS mode requires cert_path and key_path".to_string(),
            ));
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}
