use std::sync::Arc;

use axum::http::Request;
use axum::Router;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::app::AppState;

pub mod graphs;
pub mod portfolio;
pub mod ticker;

/// Assemble the full application router. Every request gets an
/// `x-request-id`, a tracing span carrying it along with method and
/// path, and an INFO response log with status and latency.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(portfolio::router())
        .merge(ticker::router())
        .merge(graphs::router())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("-"),
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
