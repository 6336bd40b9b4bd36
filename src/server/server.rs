use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderName;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::settings::{BrokerConfig, DispatchConfig, MetricsConfig};
use crate::observability::metrics::Metrics;
use crate::observability::routes as observability_routes;
use crate::server::routes;
use crate::service::token_service::TokenService;
use crate::transport::{listener, mode};
use crate::utils::constants::TOKEN_HEADER;

#[derive(Clone)]
pub struct AppState {
    pub token_service: Arc<TokenService>,
    pub metrics: Metrics,
    pub dispatch: DispatchConfig,
}

impl AppState {
    pub fn new(token_service: TokenService, metrics: Metrics, dispatch: DispatchConfig) -> Self {
        Self {
            token_service: Arc::new(token_service),
            metrics,
            dispatch,
        }
    }
}

/// Router shared between production startup and tests.
pub fn build_router(state: AppState, metrics_config: &MetricsConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(TOKEN_HEADER)]);

    Router::new()
        .merge(routes::router())
        .merge(observability_routes::router(metrics_config))
        .layer(cors)
        .with_state(state)
}

/// Validate the transport, bind, and serve until shutdown.
pub async fn start(config: BrokerConfig) -> Result<()> {
    // scheme / key / cert checks happen before anything is bound
    let transport = mode::resolve(&config.server)?;

    let metrics = Metrics::new()?;
    let token_service = TokenService::new(config.issuer);
    info!(issuer = token_service.issuer(), "token service ready");

    let state = AppState::new(token_service, metrics.clone(), config.dispatch);
    let app = build_router(state, &config.metrics);

    let tcp = listener::bind(&config.server.bind_addr()).await?;
    metrics.up.set(1);
    listener::serve(tcp, app, transport, config.server.url.as_str()).await?;
    metrics.up.set(0);

    info!("server stopped");
    Ok(())
}
