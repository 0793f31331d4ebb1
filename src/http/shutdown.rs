//! Graceful shutdown and signal handling.
//!
//! - SIGTERM/SIGINT: stop accepting connections and drain in-flight checks
//! - SIGHUP: certificate reload (manual TLS mode only)

use std::time::Duration;

use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;

/// Upper bound for draining in-flight requests. A probe without a timeout may
/// still be waiting on the upstream when this elapses.
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Setup graceful shutdown on SIGTERM and SIGINT.
pub fn setup_shutdown_handler(handle: Handle) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
            _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
        }

        handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));
        tracing::info!(
            grace_secs = SHUTDOWN_GRACE_PERIOD.as_secs(),
            "Waiting for in-flight requests"
        );
    });
}

/// Setup SIGHUP handler that reloads the certificate and key from disk.
#[cfg(unix)]
pub fn setup_reload_handler(tls_config: RustlsConfig, cert_path: String, key_path: String) {
    tokio::spawn(async move {
        let mut sighup =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup()) {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGHUP handler, certificate reload disabled");
                    return;
                }
            };

        while sighup.recv().await.is_some() {
            match tls_config.reload_from_pem_file(&cert_path, &key_path).await {
                Ok(()) => tracing::info!(cert = %cert_path, "TLS certificates reloaded"),
                Err(e) => tracing::error!(
                    error = %e,
                    cert = %cert_path,
                    key = %key_path,
                    "Failed to reload TLS certificates"
                ),
            }
        }
    });
}

#[cfg(not(unix))]
pub fn setup_reload_handler(_tls_config: RustlsConfig, _cert_path: String, _key_path: String) {
    tracing::warn!("Certificate reload via SIGHUP not supported on this platform");
}
