//! Path parameter decoded into a store [`ObjectId`].

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use database::mongodb::parse_object_id;
use mongodb::bson::oid::ObjectId;

/// Extracts a single `{id}` segment and decodes it.
///
/// A malformed id answers `400 INVALID_IDENTIFIER` before the handler runs.
///
/// ```ignore
/// async fn get_product(ObjectIdPath(id): ObjectIdPath) -> ... { }
///
/// Router::new().route("/products/{id}", get(get_product));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ObjectIdPath(pub ObjectId);

impl<S> FromRequestParts<S> for ObjectIdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        parse_object_id(&raw)
            .map(ObjectIdPath)
            .map_err(|e| AppError::from(e).into_response())
    }
}
