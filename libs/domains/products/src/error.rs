use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::mongodb::InvalidObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidObjectId),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Store unreachable or the operation failed at the driver level
    #[error("Storage error: {0}")]
    Storage(#[from] mongodb::error::Error),

    /// The store answered but refused one or more writes in a batch
    #[error("Storage rejected write: {0}")]
    WriteRejected(String),

    #[error("Image upload failed: {0}")]
    Upload(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<validator::ValidationErrors> for ProductError {
    fn from(err: validator::ValidationErrors) -> Self {
        ProductError::Validation(err.to_string())
    }
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::InvalidIdentifier(e) => AppError::InvalidIdentifier(e),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Storage(e) => AppError::Database(e),
            ProductError::WriteRejected(msg) => AppError::InternalServerError(msg),
            ProductError::Upload(msg) => AppError::BadGateway(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use database::mongodb::parse_object_id;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ProductError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ProductError::InvalidIdentifier(parse_object_id("x").unwrap_err()),
                StatusCode::BAD_REQUEST,
            ),
            (ProductError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                ProductError::WriteRejected("E11000".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ProductError::Upload("503".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
