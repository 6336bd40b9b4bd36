use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::ACCESS_CONTROL_EXPOSE_HEADERS, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::errors::RequestError;
use crate::server::request::{RawTokenRequest, TokenRequest};
use crate::server::server::AppState;
use crate::service::token_service::TokenService;
use crate::signer::ChannelType;
use crate::utils::constants::{CREATE_TOKEN_PATH, TOKEN_HEADER};

const UNKNOWN_KIND: &str = "unknown";

pub fn router() -> Router<AppState> {
    Router::new().route(CREATE_TOKEN_PATH, post(create_token))
}

/// `POST /createToken`: token goes into the `token` header, body stays empty.
async fn create_token(
    State(state): State<AppState>,
    payload: Result<Json<RawTokenRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();

    let request = payload
        .map_err(|rejection| RequestError::MalformedBody(rejection.body_text()))
        .and_then(|Json(raw)| TokenRequest::parse(raw, state.dispatch.allow_admin_tokens));

    let kind = request.as_ref().map(|r| r.kind()).unwrap_or(UNKNOWN_KIND);

    let result = request.and_then(|request| {
        let token = issue(&state.token_service, &request)?;
        info!(kind = request.kind(), user_id = request.user_id(), "created {} token", request.kind());
        debug!("token: {}", token);
        token_response(token)
    });

    state
        .metrics
        .request_duration
        .with_label_values(&[kind])
        .observe(start.elapsed().as_secs_f64());

    match result {
        Ok(response) => {
            state.metrics.tokens_issued.with_label_values(&[kind]).inc();
            response
        }
        Err(e) => {
            state
                .metrics
                .token_failures
                .with_label_values(&[kind, e.reason()])
                .inc();
            e.into_response()
        }
    }
}

fn issue(service: &TokenService, request: &TokenRequest) -> Result<String, RequestError> {
    let token = match request {
        TokenRequest::Login { user_id } => service.login(user_id)?,
        TokenRequest::Join { user_id, channel_id } => {
            service.join(user_id, channel_id, ChannelType::NonPositional)?
        }
        TokenRequest::JoinMuted { user_id, channel_id } => {
            service.join_muted(user_id, channel_id, ChannelType::NonPositional)?
        }
        TokenRequest::Kick { user_id, channel_id } => {
            service.kick(user_id, channel_id, ChannelType::NonPositional)?
        }
    };
    Ok(token)
}

fn token_response(token: String) -> Result<Response, RequestError> {
    let value = HeaderValue::try_from(token).map_err(|_| RequestError::HeaderEncoding)?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static(TOKEN_HEADER));
    headers.insert(TOKEN_HEADER, value);

    Ok((StatusCode::OK, headers).into_response())
}
