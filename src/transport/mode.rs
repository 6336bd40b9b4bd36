use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::settings::ServerConfig;
use crate::errors::{ConfigError, TransportError};

/// PEM bytes read once at startup and handed to the TLS acceptor.
#[derive(Clone)]
pub struct TlsMaterial {
    pub key_path: PathBuf,
    pub cert_path: PathBuf,
    pub key: Vec<u8>,
    pub cert: Vec<u8>,
}

impl fmt::Debug for TlsMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsMaterial")
            .field("key_path", &self.key_path)
            .field("cert_path", &self.cert_path)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum TransportMode {
    Plain,
    Secure(TlsMaterial),
}

impl TransportMode {
    pub fn is_secure(&self) -> bool {
        matches!(self, TransportMode::Secure(_))
    }

    pub fn label(&self) -> &'static str {
        if self.is_secure() {
            "HTTPS"
        } else {
            "HTTP"
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportSetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Decide between plain HTTP and HTTPS and check the decision against the
/// URL scheme. Nothing is bound here.
pub fn resolve(server: &ServerConfig) -> Result<TransportMode, TransportSetupError> {
    let secure = match (&server.tls_key_path, &server.tls_cert_path) {
        (Some(_), Some(_)) => true,
        (None, None) => false,
        _ => return Err(ConfigError::IncompleteTlsPair.into()),
    };

    if secure && !server.url_is_secure() {
        return Err(ConfigError::SecureWithPlainScheme.into());
    }
    if !secure && server.url_is_secure() {
        return Err(ConfigError::PlainWithSecureScheme.into());
    }

    match (&server.tls_key_path, &server.tls_cert_path) {
        (Some(key_path), Some(cert_path)) => {
            if !key_path.exists() || !cert_path.exists() {
                return Err(TransportError::MissingKeyOrCertificate {
                    key: key_path.clone(),
                    cert: cert_path.clone(),
                }
                .into());
            }
            let material = TlsMaterial {
                key: read(key_path)?,
                cert: read(cert_path)?,
                key_path: key_path.clone(),
                cert_path: cert_path.clone(),
            };
            info!(
                key = %key_path.display(),
                cert = %cert_path.display(),
                "secure server enabled"
            );
            Ok(TransportMode::Secure(material))
        }
        _ => Ok(TransportMode::Plain),
    }
}

fn read(path: &Path) -> Result<Vec<u8>, TransportError> {
    fs::read(path).map_err(|source| TransportError::Read {
        path: path.to_path_buf(),
        source,
    })
}
