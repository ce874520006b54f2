use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("retrieval unavailable: {0}")]
    RetrievalUnavailable(String),
    #[error("generation failed: {0}")]
    GenerationFailed(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        // Retrieval and generation failures share a status code; the variant
        // keeps them apart in logs.
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::RetrievalUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Retrieval unavailable: {}", msg),
            ),
            ApiError::GenerationFailed(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Answer generation failed: {}", msg),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
