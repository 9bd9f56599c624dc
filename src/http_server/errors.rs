//! # HTTP API Errors
//!
//! Error types for the listings HTTP API. Every error renders as a JSON body
//! with an `error` message and the matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::service::ServiceError;

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Missing or unknown API key
    #[error("Unauthorized: Invalid API key")]
    Unauthorized,

    /// Listing not found
    #[error("Listing not found")]
    NotFound,

    /// PUT/DELETE without an identifier
    #[error("Listing ID is required")]
    MissingId,

    /// Create without all required fields
    #[error("Missing required fields")]
    MissingFields(Vec<String>),

    /// Request body that is not JSON or does not describe a listing
    #[error("Invalid request body")]
    InvalidBody(String),

    /// Unparsable query string
    #[error("Invalid query parameters")]
    InvalidQuery(String),

    /// Method not served on this path
    #[error("Method not allowed")]
    MethodNotAllowed,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Store or mapping failure
    #[error("Server error")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MissingId
            | ApiError::MissingFields(_)
            | ApiError::InvalidBody(_)
            | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> serde_json::Value {
        let message = self.to_string();
        match self {
            ApiError::MissingFields(fields) => json!({ "error": message, "missingFields": fields }),
            ApiError::InvalidBody(detail)
            | ApiError::InvalidQuery(detail)
            | ApiError::Internal(detail) => json!({ "error": message, "message": detail }),
            _ => json!({ "error": message }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::MissingFields(fields) => ApiError::MissingFields(fields),
            ServiceError::InvalidFields(reason) => ApiError::InvalidBody(reason),
            other => {
                error!(code = other.code(), error = %other, "listing request failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}
