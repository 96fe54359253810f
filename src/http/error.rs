//! Error type returned by HTTP handlers.
//!
//! Rendered as `{"error": "<message>"}` with the matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The caller sent an unusable request.
    #[error("{0}")]
    BadRequest(String),

    /// Anything else that escaped the handler.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(m) => {
                warn!(message = %m, "bad request");
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal(m) => {
                error!(message = %m, "internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
