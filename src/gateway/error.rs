use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::{
    RERANK_STATUS_HEADER, RERANK_STATUS_INTERNAL_ERROR, RERANK_STATUS_INVALID_REQUEST,
    RERANK_STATUS_SCORING_ERROR,
};
use crate::rerank::RerankError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Rerank(#[from] RerankError),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Rerank(e) if e.is_invalid_input() => StatusCode::BAD_REQUEST,
            GatewayError::Rerank(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn status_tag(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => RERANK_STATUS_INVALID_REQUEST,
            GatewayError::Rerank(e) if e.is_invalid_input() => RERANK_STATUS_INVALID_REQUEST,
            GatewayError::Rerank(_) => RERANK_STATUS_SCORING_ERROR,
            GatewayError::Internal(_) => RERANK_STATUS_INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut headers = HeaderMap::new();
        headers.insert(
            RERANK_STATUS_HEADER,
            HeaderValue::from_static(self.status_tag()),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
