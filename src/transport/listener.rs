use std::time::Duration;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::errors::TransportError;
use crate::transport::mode::TransportMode;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Bind the listening socket. Failure is fatal, there is no retry.
pub async fn bind(addr: &str) -> Result<TcpListener, TransportError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| TransportError::Bind {
            addr: addr.to_owned(),
            source,
        })
}

/// Serve `app` on an already bound listener until a shutdown signal arrives.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    mode: TransportMode,
    public_url: &str,
) -> Result<(), TransportError> {
    let local_addr = listener.local_addr().map_err(TransportError::Serve)?;
    info!(
        address = %local_addr,
        "Started {} server API at {}/",
        mode.label(),
        public_url.trim_end_matches('/')
    );

    match mode {
        TransportMode::Plain => axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(TransportError::Serve),
        TransportMode::Secure(material) => {
            // several rustls providers may be compiled in, pick one explicitly
            let _ = rustls::crypto::ring::default_provider().install_default();
            let tls = RustlsConfig::from_pem(material.cert, material.key)
                .await
                .map_err(TransportError::InvalidTlsMaterial)?;
            let std_listener = listener.into_std().map_err(TransportError::Serve)?;

            let handle = Handle::new();
            let shutdown_handle = handle.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
            });

            axum_server::from_tcp_rustls(std_listener, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .map_err(TransportError::Serve)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining connections");
}
