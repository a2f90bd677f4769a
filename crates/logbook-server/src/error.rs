//! API error types with JSON responses.
//!
//! Client errors render as `{"message": "..."}`. Store errors render the
//! store's own payload so callers see the underlying database failure.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use logbook_core::ValidationError;
use logbook_store::StoreError;
use serde::{Deserialize, Serialize};

/// API error that can be returned from handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400): missing required fields or an unreadable body.
    #[error("{0}")]
    BadRequest(String),

    /// Not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Payload too large (413).
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Store error (500).
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get the error code string for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::Store(_) => "STORAGE_ERROR",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// `{"message": "..."}` body used for client errors and confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            Self::Store(e) => {
                tracing::error!(code = "STORAGE_ERROR", error = %e, "Store operation failed");
                (status, Json(e.payload())).into_response()
            }
            other => {
                tracing::debug!(code = other.code(), message = %other, "Request rejected");
                (status, Json(MessageResponse::new(other.to_string()))).into_response()
            }
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Store(StoreError::Unavailable("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_error_keeps_message() {
        let err: ApiError = ValidationError::MissingRequired("Title, date, and note are required".into()).into();
        assert_eq!(err.to_string(), "Title, date, and note are required");
        assert_eq!(err.code(), "BAD_REQUEST");
    }

    #[test]
    fn test_message_response_serialize() {
        let json = serde_json::to_string(&MessageResponse::new("Note not found")).unwrap();
        assert_eq!(json, r#"{"message":"Note not found"}"#);
    }
}
