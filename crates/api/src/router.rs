//! Application router: reelnotes routes wrapped in the HTTP middleware stack.
//!
//! `main.rs` and the integration tests both call [`build_app_router`].

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Methods the API actually serves.
const CORS_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PATCH, Method::DELETE];

/// Build the reelnotes [`Router`] with state and middleware attached.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    with_middleware(site_routes(config), config).with_state(state)
}

/// `/health`, the crawler files, and everything under `/api/v1`.
fn site_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::seo::router())
        .nest("/api/v1", routes::api_routes(config.max_upload_bytes))
}

/// Wrap `router` in the middleware stack.
///
/// Layers run outermost first: CORS, request id assignment, tracing, request
/// id echo, timeout (408), then panic recovery closest to the handlers.
fn with_middleware(router: Router<AppState>, config: &ServerConfig) -> Router<AppState> {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    router
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(trace)
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(cors_layer(&config.cors_origins))
}

/// CORS for the configured front-end origins.
///
/// An origin that is not a valid header value aborts startup.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<_> = origins
        .iter()
        .map(|origin| {
            origin
                .parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{origin}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(CORS_METHODS)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([REQUEST_ID_HEADER])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "Invalid CORS origin")]
    fn invalid_origin_aborts() {
        cors_layer(&["bad\norigin".to_string()]);
    }
}
