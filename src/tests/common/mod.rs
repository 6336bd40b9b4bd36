// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::Client;

use crate::config::settings::{DispatchConfig, MetricsConfig, TokenIssuerConfig};
use crate::errors::TokenGenerationError;
use crate::observability::metrics::Metrics;
use crate::server::server::{build_router, AppState};
use crate::service::token_service::TokenService;
use crate::signer::{TokenClaims, TokenSigner};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Credentials used by the scenario tests: ISSUER=i, SERCRET_KEY=s, DOMAIN=d, ADMIN_USER_ID=a
pub fn issuer_config() -> TokenIssuerConfig {
    TokenIssuerConfig::new("i", "s", "d", "a")
}

pub fn app_with(service: TokenService, metrics: Metrics, allow_admin_tokens: bool) -> Router {
    let state = AppState::new(service, metrics, DispatchConfig { allow_admin_tokens });
    build_router(
        state,
        &MetricsConfig {
            path: "/metrics".to_string(),
            is_enabled: true,
        },
    )
}

pub fn app() -> Router {
    app_with(
        TokenService::new(issuer_config()),
        Metrics::new().expect("metrics"),
        false,
    )
}

/// Signer that always fails, to exercise the 500 path.
pub struct FailingSigner;

impl TokenSigner for FailingSigner {
    fn sign(&self, _claims: &TokenClaims) -> Result<String, TokenGenerationError> {
        Err(TokenGenerationError::Sign("signer unavailable".into()))
    }
}

pub fn failing_service() -> TokenService {
    TokenService::with_signer(issuer_config(), Arc::new(FailingSigner))
}

/// Signer whose output cannot be carried in an HTTP header.
pub struct MultilineSigner;

impl TokenSigner for MultilineSigner {
    fn sign(&self, _claims: &TokenClaims) -> Result<String, TokenGenerationError> {
        Ok("e30.part\nsecond".to_string())
    }
}

pub fn multiline_service() -> TokenService {
    TokenService::with_signer(issuer_config(), Arc::new(MultilineSigner))
}
