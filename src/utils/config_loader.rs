use std::path::PathBuf;

use tracing::info;

use crate::config::loader::{load_issuer_config, load_server_config};
use crate::config::settings::{BrokerConfig, DispatchConfig, MetricsConfig};
use crate::errors::ConfigError;

/// Assemble the full startup configuration. Environment values come through
/// `lookup`; TLS paths and switches come from the command line.
pub fn run<F>(
    lookup: F,
    tls_key_path: Option<PathBuf>,
    tls_cert_path: Option<PathBuf>,
    metrics: MetricsConfig,
    dispatch: DispatchConfig,
) -> Result<BrokerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let server = load_server_config(&lookup)?.with_tls_paths(tls_key_path, tls_cert_path);
    let issuer = load_issuer_config(&lookup)?;

    info!(
        url = %server.url,
        issuer = %issuer.issuer,
        domain = %issuer.domain,
        ttl_seconds = issuer.token_ttl_seconds,
        "configuration loaded"
    );

    Ok(BrokerConfig {
        server,
        issuer,
        metrics,
        dispatch,
    })
}
