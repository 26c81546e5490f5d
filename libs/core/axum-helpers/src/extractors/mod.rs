//! Request extractors that reject with the shared [`AppError`](crate::AppError) body.

pub mod object_id_path;
pub mod validated_json;

pub use object_id_path::ObjectIdPath;
pub use validated_json::{ValidatedJson, ValidatedQuery};
