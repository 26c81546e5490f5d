//! Error codes carried in every error body.
//!
//! Each code has a string identifier for clients, an integer for logs and
//! dashboards, and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::InvalidIdentifier;
//! assert_eq!(code.as_str(), "INVALID_IDENTIFIER");
//! assert_eq!(code.code(), 1002);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1499)
    ValidationError,
    /// Identifier is not a 24 character hex string
    InvalidIdentifier,
    JsonExtraction,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    InvalidMultipart,
    /// Verification or reset token unknown or expired
    InvalidToken,

    // Server errors (1500-1999)
    InternalError,
    /// A collaborator (image host, mail relay) failed
    UpstreamError,

    // Store errors (2000-2999)
    DatabaseError,
    DatabaseUnavailable,
    DuplicateKey,
    DatabaseSerialization,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidIdentifier => "INVALID_IDENTIFIER",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::InvalidMultipart => "INVALID_MULTIPART",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InternalError => "INTERNAL_ERROR",
            Self::UpstreamError => "UPSTREAM_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::DuplicateKey => "DUPLICATE_KEY",
            Self::DatabaseSerialization => "DATABASE_SERIALIZATION",
        }
    }

    /// Integer code used in structured logs.
    ///
    /// Ranges: 1000-1499 client, 1500-1999 server, 2000-2999 store.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidIdentifier => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::Unauthorized => 1006,
            Self::Forbidden => 1007,
            Self::Conflict => 1008,
            Self::InvalidMultipart => 1010,
            Self::InvalidToken => 1012,

            Self::InternalError => 1500,
            Self::UpstreamError => 1502,

            Self::DatabaseError => 2001,
            Self::DatabaseUnavailable => 2002,
            Self::DuplicateKey => 2003,
            Self::DatabaseSerialization => 2004,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidIdentifier => "Invalid identifier format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::Conflict => "Resource already exists",
            Self::InvalidMultipart => "Malformed multipart form",
            Self::InvalidToken => "Token is invalid or has expired",
            Self::InternalError => "An internal server error occurred",
            Self::UpstreamError => "An upstream service failed",
            Self::DatabaseError => "Database error occurred",
            Self::DatabaseUnavailable => "Database is unreachable",
            Self::DuplicateKey => "A record with the same unique key already exists",
            Self::DatabaseSerialization => "Failed to map a database document",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
