//! HTTP gateway (Axum) exposing the rerank pipeline.
//!
//! This module is primarily used by the `rerank` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::rerank_handler;
pub use payload::{HealthResponse, RawDocument, ReadyResponse, RerankRequest};
pub use state::HandlerState;

use crate::constants::{RERANK_STATUS_HEADER, RERANK_STATUS_HEALTHY, RERANK_STATUS_OK};
use crate::model::InferenceBackend;

pub fn create_router_with_state<B>(state: HandlerState<B>) -> Router
where
    B: InferenceBackend + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<B>))
        .route("/rerank", post(rerank_handler::<B>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe. Independent of the model and the pipeline.
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        RERANK_STATUS_HEADER,
        HeaderValue::from_static(RERANK_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse {
            status: RERANK_STATUS_HEALTHY,
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<B>(State(state): State<HandlerState<B>>) -> Response
where
    B: InferenceBackend + 'static,
{
    let model_mode = if state.is_stub() { "stub" } else { "real" };

    let mut headers = HeaderMap::new();
    headers.insert(
        RERANK_STATUS_HEADER,
        HeaderValue::from_static(RERANK_STATUS_OK),
    );

    (
        StatusCode::OK,
        headers,
        Json(ReadyResponse {
            status: RERANK_STATUS_OK,
            model_mode,
            max_concurrent_inferences: state.max_concurrent_inferences,
        }),
    )
        .into_response()
}
