//! Application error type and its HTTP mapping.
//!
//! Every fallible operation in the service returns [`AppError`]. Handlers
//! return it directly; [`IntoResponse`] renders a JSON body of the form
//! `{"error": {"code", "message", "details"}}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input (400).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Unknown or expired short code (404).
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Requested custom short code is already taken (409).
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Client exceeded its admission window (429).
    #[error("{message}")]
    TooManyRequests { message: String, details: Value },

    /// Call rejected by the resilience layer (503).
    #[error("{message}")]
    Unavailable { message: String, details: Value },

    /// Storage or other unexpected failure (500).
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn too_many_requests(message: impl Into<String>, details: Value) -> Self {
        Self::TooManyRequests {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Duplicate custom short code.
    pub fn duplicate_code(code: &str) -> Self {
        Self::conflict(
            "Custom short code already exists",
            json!({ "short_code": code }),
        )
    }

    /// Short code that is absent or past its expiry.
    pub fn short_code_not_found(code: &str) -> Self {
        Self::not_found("Short code not found", json!({ "short_code": code }))
    }

    /// True for failures that say nothing about the caller's input and may
    /// succeed on another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            Self::Validation { message, details } => ("validation_error", message, details),
            Self::NotFound { message, details } => ("not_found", message, details),
            Self::Conflict { message, details } => ("conflict", message, details),
            Self::TooManyRequests { message, details } => ("rate_limited", message, details),
            Self::Unavailable { message, details } => ("service_unavailable", message, details),
            Self::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::internal("Storage error", json!({ "reason": e.to_string() }))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::internal("Corrupt stored record", json!({ "reason": e.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::short_code_not_found("abc").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::duplicate_code("abc").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::too_many_requests("x", json!({})).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::unavailable("x", json!({})).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::internal("x", json!({})).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_only_internal_is_transient() {
        assert!(AppError::internal("boom", json!({})).is_transient());
        assert!(!AppError::duplicate_code("abc").is_transient());
        assert!(!AppError::short_code_not_found("abc").is_transient());
        assert!(!AppError::unavailable("open", json!({})).is_transient());
    }

    #[test]
    fn test_error_info_payload() {
        let info = AppError::duplicate_code("abc123").to_error_info();

        assert_eq!(info.code, "conflict");
        assert_eq!(info.message, "Custom short code already exists");
        assert_eq!(info.details["short_code"], "abc123");
    }

    #[test]
    fn test_display_uses_message() {
        let err = AppError::short_code_not_found("zzz");
        assert_eq!(err.to_string(), "Short code not found");
    }
}
