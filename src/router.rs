//! HTTP app assembly for the storyboard server.
//!
//! The server binary and the integration tests both go through
//! [`build_app_router`], so tests exercise the same layers clients hit.

use std::time::Duration;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::Config;
use crate::error::AppError;
use crate::routes;
use crate::state::AppState;

/// Health plus `/api`, wrapped in CORS, `x-request-id` tagging, tracing and
/// panic recovery.
///
/// Single-call routes share a `request_timeout_secs` deadline. `/api/generate`
/// issues one provider call per part, each bounded by `provider_timeout_secs`,
/// so it has no overall deadline and a slow part only costs that part.
pub fn build_app_router(state: AppState, config: &Config) -> Router {
    let deadline = Duration::from_secs(config.request_timeout_secs);
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(with_deadline(routes::health::router(), deadline))
        .nest("/api", routes::api_routes(deadline))
        .layer(CatchPanicLayer::new())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(build_cors_layer(config))
        .with_state(state)
}

/// Cut every route already in `router` off after `deadline` with a JSON 408.
pub(crate) fn with_deadline(router: Router<AppState>, deadline: Duration) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(deadline, enforce_deadline))
}

async fn enforce_deadline(
    State(deadline): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    match tokio::time::timeout(deadline, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(%path, limit_secs = deadline.as_secs(), "Request deadline exceeded");
            AppError::Timeout(format!(
                "Request did not complete within {} seconds",
                deadline.as_secs()
            ))
            .into_response()
        }
    }
}

/// CORS for the configured browser origins; unparseable origins are logged
/// and left out.
pub fn build_cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(%origin, error = %err, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(3600))
}
