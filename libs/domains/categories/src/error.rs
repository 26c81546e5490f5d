use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found: {0}")]
    NotFound(String),

    #[error("Category with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] mongodb::error::Error),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

impl From<validator::ValidationErrors> for CategoryError {
    fn from(err: validator::ValidationErrors) -> Self {
        CategoryError::Validation(err.to_string())
    }
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(id) => AppError::NotFound(format!("Category {} not found", id)),
            CategoryError::DuplicateName(name) => {
                AppError::Conflict(format!("Category with name '{}' already exists", name))
            }
            CategoryError::Validation(msg) => AppError::BadRequest(msg),
            CategoryError::Storage(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
