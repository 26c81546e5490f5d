pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::mongodb::{InvalidObjectId, is_duplicate_key, is_serialization, is_unavailable};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body returned for every error response.
///
/// ```json
/// {
///   "code": 1002,
///   "error": "INVALID_IDENTIFIER",
///   "message": "invalid identifier 'abc': expected 24 hex characters",
///   "details": null
/// }
/// ```
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    pub message: String,
    /// Structured details such as per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error type shared by every handler; domain errors convert into it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidObjectId),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad Gateway: {0}")]
    BadGateway(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// Status, code, client message and optional details for this error.
    ///
    /// Server-side failures are logged here with their integer code; the
    /// message sent to the client never includes driver internals.
    fn parts(self) -> (StatusCode, ErrorCode, String, Option<serde_json::Value>) {
        match self {
            AppError::Database(e) => map_mongo_error(&e),
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = ErrorCode::JsonExtraction.code(), error = ?e, "JSON extraction error");
                (e.status(), ErrorCode::JsonExtraction, e.body_text(), None)
            }
            AppError::Multipart(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidMultipart.code(), error = ?e, "Multipart error");
                (e.status(), ErrorCode::InvalidMultipart, e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), error = ?e, "Validation error");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError,
                    ErrorCode::ValidationError.default_message().to_string(),
                    serde_json::to_value(&e).ok(),
                )
            }
            AppError::InvalidIdentifier(e) => {
                tracing::info!(error_code = ErrorCode::InvalidIdentifier.code(), input = %e.input, "Invalid identifier");
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidIdentifier, e.to_string(), None)
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationError, msg, None)
            }
            AppError::InvalidToken(msg) => {
                tracing::info!("Invalid token: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidToken, msg, None)
            }
            AppError::Unauthorized(msg) => {
                tracing::info!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, msg, None)
            }
            AppError::Forbidden(msg) => {
                tracing::info!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, ErrorCode::Forbidden, msg, None)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg, None)
            }
            AppError::Conflict(msg) => {
                tracing::info!("Conflict: {}", msg);
                (StatusCode::CONFLICT, ErrorCode::Conflict, msg, None)
            }
            AppError::BadGateway(msg) => {
                tracing::error!(error_code = ErrorCode::UpstreamError.code(), "Upstream failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorCode::UpstreamError,
                    ErrorCode::UpstreamError.default_message().to_string(),
                    None,
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = ErrorCode::InternalError.code(), "Internal server error: {}", msg);
                internal(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

fn internal(code: ErrorCode) -> (StatusCode, ErrorCode, String, Option<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        code,
        code.default_message().to_string(),
        None,
    )
}

fn map_mongo_error(error: &mongodb::error::Error) -> (StatusCode, ErrorCode, String, Option<serde_json::Value>) {
    if is_duplicate_key(error) {
        tracing::info!(error_code = ErrorCode::DuplicateKey.code(), "Duplicate key: {}", error);
        return (
            StatusCode::CONFLICT,
            ErrorCode::DuplicateKey,
            ErrorCode::DuplicateKey.default_message().to_string(),
            None,
        );
    }

    if is_unavailable(error) {
        tracing::error!(error_code = ErrorCode::DatabaseUnavailable.code(), error = ?error, "Database unreachable");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabaseUnavailable,
            ErrorCode::DatabaseUnavailable.default_message().to_string(),
            None,
        );
    }

    if is_serialization(error) {
        tracing::error!(error_code = ErrorCode::DatabaseSerialization.code(), error = ?error, "Document mapping failed");
        return internal(ErrorCode::DatabaseSerialization);
    }

    tracing::error!(error_code = ErrorCode::DatabaseError.code(), error = ?error, "Database error");
    internal(ErrorCode::DatabaseError)
}

/// Build an error response outside of the [`AppError`] flow, e.g. in middleware.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::mongodb::parse_object_id;

    #[test]
    fn invalid_identifier_is_bad_request() {
        let err = parse_object_id("nope").unwrap_err();
        let (status, code, message, _) = AppError::from(err).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, ErrorCode::InvalidIdentifier);
        assert!(message.contains("nope"));
    }

    #[test]
    fn not_found_keeps_message() {
        let (status, code, message, _) = AppError::NotFound("Product 42 not found".into()).parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, ErrorCode::NotFound);
        assert_eq!(message, "Product 42 not found");
    }

    #[test]
    fn internal_error_hides_detail() {
        let (status, code, message, _) =
            AppError::InternalServerError("pool exhausted at 10.0.0.4".into()).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, ErrorCode::InternalError);
        assert!(!message.contains("10.0.0.4"));
    }

    #[test]
    fn bad_gateway_maps_to_upstream_code() {
        let (status, code, _, _) = AppError::BadGateway("cloudinary 500".into()).parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, ErrorCode::UpstreamError);
    }

    #[test]
    fn unreachable_store_is_service_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let (status, code, _, _) = AppError::Database(mongodb::error::Error::from(io)).parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, ErrorCode::DatabaseUnavailable);
    }
}
