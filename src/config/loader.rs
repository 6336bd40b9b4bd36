use url::Url;

use crate::config::settings::{ServerConfig, TokenIssuerConfig};
use crate::errors::ConfigError;
use crate::utils::constants::{
    DEFAULT_BIND_HOST, DEFAULT_TOKEN_TTL_SECONDS, ENV_ADMIN_USER_ID, ENV_BIND_HOST, ENV_DOMAIN,
    ENV_ISSUER, ENV_SECRET_KEY, ENV_SECRET_KEY_FALLBACK, ENV_SERVER_URL, ENV_TOKEN_TTL_SECONDS,
};

/// Read a variable from the real process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Load the server URL and port. TLS paths come from the command line and are
/// attached later with [`ServerConfig::with_tls_paths`].
pub fn load_server_config<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = required(&lookup, ENV_SERVER_URL)?;
    let url = Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
        var: ENV_SERVER_URL,
        source,
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::UnsupportedScheme(other.to_owned())),
    }

    // `Url::port` drops a written port that equals the scheme default
    let port = url
        .port()
        .or_else(|| {
            declares_port(&raw)
                .then(|| url.port_or_known_default())
                .flatten()
        })
        .ok_or_else(|| ConfigError::MissingPort(ENV_SERVER_URL.to_owned()))?;

    let host = optional(&lookup, ENV_BIND_HOST).unwrap_or_else(|| DEFAULT_BIND_HOST.to_owned());

    Ok(ServerConfig {
        url,
        port,
        host,
        tls_key_path: None,
        tls_cert_path: None,
    })
}

pub fn load_issuer_config<F>(lookup: F) -> Result<TokenIssuerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let issuer = required(&lookup, ENV_ISSUER)?;
    let secret_key = optional(&lookup, ENV_SECRET_KEY)
        .or_else(|| optional(&lookup, ENV_SECRET_KEY_FALLBACK))
        .ok_or(ConfigError::MissingVar(ENV_SECRET_KEY))?;
    let domain = required(&lookup, ENV_DOMAIN)?;
    let admin_user_id = required(&lookup, ENV_ADMIN_USER_ID)?;

    let token_ttl_seconds = match optional(&lookup, ENV_TOKEN_TTL_SECONDS) {
        None => DEFAULT_TOKEN_TTL_SECONDS,
        Some(value) => match value.parse::<u64>() {
            Ok(ttl) if ttl > 0 => ttl,
            _ => {
                return Err(ConfigError::InvalidValue {
                    var: ENV_TOKEN_TTL_SECONDS,
                    value,
                })
            }
        },
    };

    Ok(TokenIssuerConfig {
        issuer,
        secret_key,
        domain,
        admin_user_id,
        token_ttl_seconds,
    })
}

/// Whether the authority of `raw` carries `:<digits>` after the host.
fn declares_port(raw: &str) -> bool {
    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let after_host = match host_port.rfind(']') {
        Some(end) => &host_port[end + 1..],
        None => host_port,
    };
    after_host
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::MissingVar(key))
}
