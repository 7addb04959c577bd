pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Error as UuidError;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Every error leaves the API in this shape:
/// - `code`: integer error code for logs (e.g., 1008)
/// - `error`: machine-readable identifier (e.g., "CONFLICT")
/// - `message`: human-readable message
/// - `details`: optional structured details (e.g., per-field validation errors)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1008,
///   "error": "CONFLICT",
///   "message": "Category 0190... is still referenced by at least one Product",
///   "details": null
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type that converts into an HTTP response.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("UUID error: {0}")]
    UuidError(#[from] UuidError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Status code and error code this error is reported with.
    pub fn classify(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::JsonExtractorRejection(JsonRejection::MissingJsonContentType(e)) => {
                (e.status(), ErrorCode::InvalidJson)
            }
            AppError::JsonExtractorRejection(
                JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_),
            ) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationError),
            AppError::JsonExtractorRejection(e) => (e.status(), ErrorCode::InvalidJson),
            AppError::ValidationError(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationError)
            }
            AppError::UuidError(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidUuid),
            AppError::InvalidReference(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidReference),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
            AppError::InternalServerError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError)
            }
            AppError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::ServiceUnavailable)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();

        let (message, details) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::info!(error_code = code.code(), "JSON extraction error: {}", e);
                (e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = code.code(), "Validation error: {:?}", e);
                (
                    code.default_message().to_string(),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null)),
                )
            }
            AppError::UuidError(e) => {
                tracing::info!(error_code = code.code(), "UUID error: {}", e);
                (code.default_message().to_string(), None)
            }
            AppError::BadRequest(msg)
            | AppError::InvalidReference(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => {
                tracing::info!(error_code = code.code(), "{}", msg);
                (msg, None)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = code.code(), "Service unavailable: {}", msg);
                (msg, None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = code.code(), "Internal server error: {}", msg);
                (msg, None)
            }
        };

        let body = ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}
