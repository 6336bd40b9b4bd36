use std::io;
use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

/// Malformed or missing environment configuration, or an inconsistent
/// TLS / URL-scheme combination. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("please, define {0} in your environment or .env file")]
    MissingVar(&'static str),

    #[error("{var} is not a valid absolute URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{0} must declare an explicit port")]
    MissingPort(String),

    #[error("unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("invalid value '{value}' for {var}")]
    InvalidValue { var: &'static str, value: String },

    #[error("both a private key and a certificate are required for secure mode")]
    IncompleteTlsPair,

    #[error("you cannot start the server in secure mode while the server address is plain http")]
    SecureWithPlainScheme,

    #[error("you cannot start the server in insecure mode while the server address is https")]
    PlainWithSecureScheme,
}

/// Key / certificate and socket failures. Fatal, like [`ConfigError`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("cannot start server in secure mode without private key or certificate files (key: {key}, cert: {cert})")]
    MissingKeyOrCertificate { key: PathBuf, cert: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid TLS key or certificate: {0}")]
    InvalidTlsMaterial(#[source] io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// Raised by the token service for a single request. Recovered at the
/// request boundary and surfaced as an opaque HTTP 500.
#[derive(Debug, Error)]
pub enum TokenGenerationError {
    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("channel id must not be empty")]
    EmptyChannelId,

    #[error("failed to encode token claims: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to sign token: {0}")]
    Sign(String),
}

/// Per-request failures at the dispatcher boundary. The response body is
/// always empty, details only go to the log.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("unsupported request type '{0}'")]
    UnsupportedRequestType(String),

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("token is not a valid header value")]
    HeaderEncoding,

    #[error(transparent)]
    Token(#[from] TokenGenerationError),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::UnsupportedRequestType(_)
            | RequestError::MissingField(_)
            | RequestError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            RequestError::HeaderEncoding | RequestError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Metric label.
    pub fn reason(&self) -> &'static str {
        match self {
            RequestError::UnsupportedRequestType(_) => "unsupported_type",
            RequestError::MissingField(_) => "missing_field",
            RequestError::MalformedBody(_) => "malformed_body",
            RequestError::HeaderEncoding => "header_encoding",
            RequestError::Token(_) => "token_generation",
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("token request failed: {}", self);
        } else {
            warn!("token request rejected: {}", self);
        }
        status.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_name_the_variable() {
        let err = ConfigError::MissingVar("SERVER_URL");
        assert!(err.to_string().contains("SERVER_URL"));

        let err = ConfigError::InvalidValue {
            var: "TOKEN_TTL_SECONDS",
            value: "soon".into(),
        };
        assert_eq!(err.to_string(), "invalid value 'soon' for TOKEN_TTL_SECONDS");
    }

    #[test]
    fn request_errors_map_to_status() {
        assert_eq!(
            RequestError::UnsupportedRequestType("logout".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(RequestError::MissingField("userId").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RequestError::from(TokenGenerationError::EmptyUserId).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let err = RequestError::from(TokenGenerationError::Sign("hsm offline".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.reason(), "token_generation");
        assert_eq!(RequestError::HeaderEncoding.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
