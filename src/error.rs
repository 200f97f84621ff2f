/// Error types for Asset Service
///
/// This module defines all error types that can occur in the asset-service.
/// Errors are converted to appropriate HTTP responses for API clients; the
/// wire bodies never expose storage-backend detail.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;

/// Result type for asset-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Request validation failed (missing file, bad field)
    Validation(String),

    /// Request rejected by the origin allow-list
    Forbidden(String),

    /// Upload exceeds the transport-layer size cap
    PayloadTooLarge,

    /// Uploaded bytes are not a recognizable image
    Decode(String),

    /// Re-encoding a processed image failed
    Encode(String),

    /// Storage backend write or read failed
    Store(String),

    /// Requested asset does not exist
    NotFound,

    /// Internal server error
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::PayloadTooLarge => write!(f, "File exceeds upload size limit"),
            AppError::Decode(msg) => write!(f, "Decode error: {}", msg),
            AppError::Encode(msg) => write!(f, "Encode error: {}", msg),
            AppError::Store(msg) => write!(f, "Storage error: {}", msg),
            AppError::NotFound => write!(f, "Image not found"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Decode(_)
            | AppError::Encode(_)
            | AppError::Store(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // 5xx detail is logged and replaced with a generic body; a missing
        // asset is an expected outcome and is not logged.
        let body = match self {
            AppError::Validation(msg) => json!({ "error": msg }),
            AppError::Forbidden(msg) => json!({ "error": format!("Forbidden: {}", msg) }),
            AppError::PayloadTooLarge => json!({ "error": "File exceeds upload size limit" }),
            AppError::NotFound => json!({ "error": "Image not found" }),
            AppError::Decode(msg) | AppError::Encode(msg) => {
                tracing::error!("image processing failed: {}", msg);
                json!({ "error": "Internal Server Error" })
            }
            AppError::Store(msg) => {
                tracing::error!("storage backend error: {}", msg);
                json!({ "error": "Internal Server Error" })
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                json!({ "error": "Internal Server Error" })
            }
        };

        HttpResponse::build(status).json(body)
    }
}

impl std::error::Error for AppError {}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
