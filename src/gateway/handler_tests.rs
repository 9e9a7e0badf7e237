//! Router-level tests for the rerank gateway.
//!
//! Requests go through the full Axum stack with `tower::ServiceExt::oneshot`,
//! backed by either the stub cross-encoder or a scripted [`MockBackend`].

use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use crate::constants::RERANK_STATUS_HEADER;
use crate::gateway::create_router_with_state;
use crate::gateway::state::HandlerState;
use crate::model::{CrossEncoder, MockBackend};
use crate::rerank::{Reranker, ScoredResult};

fn stub_router() -> Router {
    let encoder = CrossEncoder::stub().expect("stub cross-encoder");
    create_router_with_state(HandlerState::new(encoder, 2))
}

fn mock_router(backend: MockBackend) -> (Router, Arc<Reranker<MockBackend>>) {
    let reranker = Arc::new(Reranker::new(backend));
    let state = HandlerState::from_reranker(Arc::clone(&reranker), 1);
    (create_router_with_state(state), reranker)
}

async fn post_json(router: &Router, body: serde_json::Value) -> axum::response::Response {
    post_raw(router, serde_json::to_string(&body).unwrap()).await
}

async fn post_raw(router: &Router, body: String) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri("/rerank")
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap();

    router.clone().oneshot(request).await.unwrap()
}

async fn get(router: &Router, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    router.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn status_header(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(RERANK_STATUS_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
}

mod rerank_endpoint_tests {
    use super::*;

    #[tokio::test]
    async fn test_rerank_drops_blank_document() {
        let router = stub_router();

        let response = post_json(
            &router,
            serde_json::json!({
                "query": "capital of France",
                "documents": ["Paris is the capital of France.", ""],
                "top_n": 5
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(status_header(&response), "ok");

        let results: Vec<ScoredResult> =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 0);
        assert!(results[0].score > 0.5);
    }

    #[tokio::test]
    async fn test_rerank_drops_unencodable_document() {
        let router = stub_router();

        let body = r#"{"query":"capital of France","documents":["Paris is the capital of France.","\ud800"],"top_n":5}"#;
        let response = post_raw(&router, body.to_string()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(status_header(&response), "ok");

        let results: Vec<ScoredResult> =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 0);
        assert!(results[0].score > 0.5);
    }

    #[tokio::test]
    async fn test_rerank_unencodable_document_keeps_later_indices() {
        let (router, _) = mock_router(MockBackend::with_logits(vec![0.0, 4.0]));

        let body = r#"{"query":"q","documents":["a","\ud800","c"],"top_n":3}"#;
        let response = post_raw(&router, body.to_string()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let results: Vec<ScoredResult> =
            serde_json::from_value(body_json(response).await).unwrap();
        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![2, 0]);
    }

    #[tokio::test]
    async fn test_rerank_response_shape() {
        let router = stub_router();

        let response = post_json(
            &router,
            serde_json::json!({
                "query": "rust borrow checker",
                "documents": ["gardening tips", "the rust borrow checker explained"],
                "top_n": 1
            }),
        )
        .await;

        let body = body_json(response).await;
        let array = body.as_array().expect("response is a JSON array");
        assert_eq!(array.len(), 1);
        assert_eq!(array[0]["index"], 1);
        assert!(array[0]["score"].is_number());
    }

    #[tokio::test]
    async fn test_rerank_empty_query_is_bad_request() {
        let router = stub_router();

        let response = post_json(
            &router,
            serde_json::json!({"query": "", "documents": ["a", "b"], "top_n": 1}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(status_header(&response), "invalid_request");

        let body = body_json(response).await;
        assert_eq!(body["code"], 400);
        assert!(body["error"].as_str().unwrap().contains("query"));
    }

    #[tokio::test]
    async fn test_rerank_empty_documents_is_bad_request() {
        let router = stub_router();

        let response = post_json(
            &router,
            serde_json::json!({"query": "x", "documents": [], "top_n": 1}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("documents"));
    }

    #[tokio::test]
    async fn test_rerank_non_positive_top_n_is_bad_request() {
        let router = stub_router();

        for top_n in [0, -5] {
            let response = post_json(
                &router,
                serde_json::json!({"query": "x", "documents": ["a", "b", "c"], "top_n": top_n}),
            )
            .await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = body_json(response).await;
            assert!(body["error"].as_str().unwrap().contains("top_n"));
        }
    }

    #[tokio::test]
    async fn test_rerank_blank_documents_is_bad_request() {
        let router = stub_router();

        let response = post_json(
            &router,
            serde_json::json!({"query": "x", "documents": ["  ", "\t"], "top_n": 2}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("no valid documents")
        );
    }

    #[tokio::test]
    async fn test_rerank_malformed_body_is_bad_request() {
        let router = stub_router();

        let response = post_raw(&router, "{not json".to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = post_json(&router, serde_json::json!({"query": "x", "top_n": 1})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(status_header(&response), "invalid_request");
    }

    #[tokio::test]
    async fn test_rerank_all_nan_logits() {
        let (router, _) = mock_router(MockBackend::nan());

        let response = post_json(
            &router,
            serde_json::json!({"query": "q", "documents": ["a", "b", "c"], "top_n": 3}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let results: Vec<ScoredResult> =
            serde_json::from_value(body_json(response).await).unwrap();
        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(results.iter().all(|r| r.score == 0.0));
    }

    #[tokio::test]
    async fn test_rerank_backend_failure_is_internal_error() {
        let (router, reranker) = mock_router(MockBackend::constant(0.0).failing("CUDA OOM"));

        let response = post_json(
            &router,
            serde_json::json!({"query": "q", "documents": ["a"], "top_n": 1}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_header(&response), "scoring_error");
        let body = body_json(response).await;
        assert_eq!(body["code"], 500);
        assert!(body["error"].as_str().unwrap().contains("CUDA OOM"));
        assert_eq!(reranker.backend().infer_calls(), 1);
    }

    #[tokio::test]
    async fn test_rerank_invalid_input_skips_backend() {
        let (router, reranker) = mock_router(MockBackend::constant(1.0));

        let response = post_json(
            &router,
            serde_json::json!({"query": "   ", "documents": ["a"], "top_n": 1}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(reranker.backend().encode_calls(), 0);
    }

    #[tokio::test]
    async fn test_rerank_concurrent_requests() {
        let (router, reranker) = mock_router(MockBackend::with_logits(vec![0.0, 1.0]));

        let requests = (0..8).map(|_| {
            let router = router.clone();
            async move {
                post_json(
                    &router,
                    serde_json::json!({"query": "q", "documents": ["a", "b"], "top_n": 2}),
                )
                .await
            }
        });
        let responses = futures_join_all(requests).await;

        for response in responses {
            assert_eq!(response.status(), StatusCode::OK);
            let results: Vec<ScoredResult> =
                serde_json::from_value(body_json(response).await).unwrap();
            assert_eq!(results[0].index, 1);
        }
        assert_eq!(reranker.backend().infer_calls(), 8);
    }

    async fn futures_join_all<F>(futures: impl Iterator<Item = F>) -> Vec<F::Output>
    where
        F: std::future::Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let handles: Vec<_> = futures.map(tokio::spawn).collect();
        let mut outputs = Vec::with_capacity(handles.len());
        for handle in handles {
            outputs.push(handle.await.unwrap());
        }
        outputs
    }
}

mod probe_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let router = stub_router();

        for uri in ["/health", "/healthz"] {
            let response = get(&router, uri).await;

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(status_header(&response), "healthy");
            assert_eq!(body_json(response).await["status"], "healthy");
        }
    }

    #[tokio::test]
    async fn test_health_independent_of_backend() {
        let (router, reranker) = mock_router(MockBackend::constant(0.0).failing("broken"));

        let response = get(&router, "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(reranker.backend().encode_calls(), 0);
    }

    #[tokio::test]
    async fn test_ready_endpoint_reports_stub_mode() {
        let router = stub_router();

        let response = get(&router, "/ready").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model_mode"], "stub");
        assert_eq!(body["max_concurrent_inferences"], 2);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let router = stub_router();
        let response = get(&router, "/v1/unknown").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

mod error_tests {
    use crate::gateway::error::GatewayError;
    use crate::model::BackendError;
    use crate::rerank::{InvalidInput, RerankError};
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                GatewayError::InvalidRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                GatewayError::Rerank(RerankError::from(InvalidInput::EmptyQuery)),
                StatusCode::BAD_REQUEST,
            ),
            (
                GatewayError::Rerank(RerankError::from(InvalidInput::NoValidDocuments {
                    total: 2,
                })),
                StatusCode::BAD_REQUEST,
            ),
            (
                GatewayError::Rerank(RerankError::from(BackendError::InferenceFailed {
                    reason: "boom".to_string(),
                })),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GatewayError::Internal("panic".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected, "{err}");
        }
    }
}
