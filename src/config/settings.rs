use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use url::Url;

use crate::utils::constants::{DEFAULT_METRICS_PATH, DEFAULT_TOKEN_TTL_SECONDS};

/// ================================
/// Server / transport settings
/// ================================
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub url: Url,
    pub port: u16,
    pub host: String,
    pub tls_key_path: Option<PathBuf>,
    pub tls_cert_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Url scheme is the declared intent for secure mode.
    pub fn url_is_secure(&self) -> bool {
        self.url.scheme() == "https"
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn with_tls_paths(mut self, key: Option<PathBuf>, cert: Option<PathBuf>) -> Self {
        // empty CLI values count as absent
        self.tls_key_path = key.filter(|p| !p.as_os_str().is_empty());
        self.tls_cert_path = cert.filter(|p| !p.as_os_str().is_empty());
        self
    }
}

/// ================================
/// Token issuer credentials
/// ================================
#[derive(Clone)]
pub struct TokenIssuerConfig {
    pub issuer: String,
    pub secret_key: String,
    pub domain: String,
    pub admin_user_id: String,
    pub token_ttl_seconds: u64,
}

impl TokenIssuerConfig {
    pub fn new(issuer: &str, secret_key: &str, domain: &str, admin_user_id: &str) -> Self {
        Self {
            issuer: issuer.to_owned(),
            secret_key: secret_key.to_owned(),
            domain: domain.to_owned(),
            admin_user_id: admin_user_id.to_owned(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}

impl fmt::Debug for TokenIssuerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuerConfig")
            .field("issuer", &self.issuer)
            .field("secret_key", &"***")
            .field("domain", &self.domain)
            .field("admin_user_id", &self.admin_user_id)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

/// ================================
/// Dispatcher / metrics switches
/// ================================
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    pub path: String,
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_METRICS_PATH.to_owned(),
            is_enabled: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    /// Serve `kick` requests signed as the admin user.
    pub allow_admin_tokens: bool,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Everything the broker needs after startup. Built once, then moved into
/// the components that own each part.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub server: ServerConfig,
    pub issuer: TokenIssuerConfig,
    pub metrics: MetricsConfig,
    pub dispatch: DispatchConfig,
}
