use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::constants::{RERANK_STATUS_HEADER, RERANK_STATUS_OK};
use crate::gateway::error::GatewayError;
use crate::gateway::payload::RerankRequest;
use crate::gateway::state::HandlerState;
use crate::model::InferenceBackend;
use crate::rerank::{self, ResultSet};

/// `POST /rerank`.
///
/// Input checks run on the async task. Only the scoring call holds an
/// inference permit, and it runs on the blocking pool.
#[instrument(
    skip(state, payload),
    fields(
        request_id = %Uuid::new_v4(),
        documents = tracing::field::Empty,
        top_n = tracing::field::Empty
    )
)]
pub async fn rerank_handler<B>(
    State(state): State<HandlerState<B>>,
    payload: Result<Json<RerankRequest>, JsonRejection>,
) -> Result<Response, GatewayError>
where
    B: InferenceBackend + 'static,
{
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected malformed rerank body");
        GatewayError::InvalidRequest(rejection.body_text())
    })?;

    let span = tracing::Span::current();
    span.record("documents", request.documents.len());
    span.record("top_n", request.top_n);

    info!(
        query_len = request.query.len(),
        num_documents = request.documents.len(),
        top_n = request.top_n,
        "Received rerank request"
    );
    debug!(query = %request.query, "Rerank query");

    let input = rerank::prepare(&request.query, &request.documents, request.top_n)
        .inspect_err(|e| info!(error = %e, "Rejected rerank request"))?;

    let permit = Arc::clone(&state.inference_permits)
        .acquire_owned()
        .await
        .map_err(|e| GatewayError::Internal(format!("inference gate closed: {}", e)))?;

    let reranker = Arc::clone(&state.reranker);
    let top_n = request.top_n;
    let outcome = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        reranker.score_prepared(&input, top_n)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Scoring task failed");
        GatewayError::Internal(format!("scoring task failed: {}", e))
    })?;

    let results = outcome.inspect_err(|e| error!(error = %e, "Error during reranking"))?;

    Ok(make_response(results))
}

pub(crate) fn make_response(results: ResultSet) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        RERANK_STATUS_HEADER,
        HeaderValue::from_static(RERANK_STATUS_OK),
    );

    (StatusCode::OK, headers, Json(results)).into_response()
}
