//! API error handling module.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::db::StoreError;

pub const INVALID_REQUEST: &str = "Invalid request data.";
pub const INVALID_VOTE: &str = "Invalid vote value.";

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed input; raised before the store is touched
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    NotFound(String),

    /// Store failure. `message` names the operation, `source` carries the store text.
    #[error("{message}")]
    DatabaseError {
        message: String,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn invalid_request() -> Self {
        ApiError::ValidationError(INVALID_REQUEST.to_string())
    }

    pub fn invalid_vote() -> Self {
        ApiError::ValidationError(INVALID_VOTE.to_string())
    }

    pub fn not_found(message: &str) -> Self {
        ApiError::NotFound(message.to_string())
    }

    /// Adapter for `map_err` that wraps a store failure under `message`
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::DatabaseError {
            message: message.to_string(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DatabaseError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::DatabaseError { message, source } => {
                match &source {
                    StoreError::Constraint(_) => {
                        warn!(kind = source.kind(), "{}: {}", message, source)
                    }
                    _ => error!(kind = source.kind(), "{}: {}", message, source),
                }
                ErrorResponse {
                    message,
                    error: Some(source.to_string()),
                }
            }
            ApiError::ValidationError(message) | ApiError::NotFound(message) => {
                debug!(status = status.as_u16(), "{}", message);
                ErrorResponse {
                    message,
                    error: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        debug!("Rejected request body: {}", err.body_text());
        ApiError::invalid_request()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let err = ApiError::invalid_request();
        assert_eq!(err.to_string(), INVALID_REQUEST);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::not_found("Question not found.");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::store("Unable to create question.")(StoreError::Query("boom".to_string()));
        assert_eq!(err.to_string(), "Unable to create question.");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_omits_empty_error() {
        let response = ErrorResponse {
            message: "Question not found.".to_string(),
            error: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"message":"Question not found."}"#);

        let response = ErrorResponse {
            message: "Unable to fetch questions.".to_string(),
            error: Some("connection refused".to_string()),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""error":"connection refused""#));
    }
}
