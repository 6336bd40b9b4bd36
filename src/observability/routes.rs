use crate::config::settings::MetricsConfig;
use crate::server::server::AppState;
use crate::utils::constants::HEALTH_PATH;
use axum::routing::get;
use axum::{extract::State, response::IntoResponse, Router};
use http::{header::CONTENT_TYPE, StatusCode};
use prometheus::{Encoder, TextEncoder};
use tracing::error;

pub fn router(metrics_config: &MetricsConfig) -> Router<AppState> {
    // create router
    let mut router = Router::new().route(HEALTH_PATH, get(health));
    if metrics_config.is_enabled {
        router = router.route(metrics_config.path.as_str(), get(get_metrics));
    }
    router
}

async fn health() -> &'static str {
    "ok"
}

async fn get_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = state.metrics.registry.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("failed to encode metrics: {}", e);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [(CONTENT_TYPE, encoder.format_type().to_owned())],
        buffer,
    )
        .into_response()
}
