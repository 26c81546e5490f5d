//! Categories domain: named groupings referenced by products.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{CategoryError, CategoryResult};
pub use handlers::ApiDoc;
pub use models::{Category, CategoryResponse, CreateCategory, UpdateCategory};
pub use mongodb::MongoCategoryRepository;
pub use repository::CategoryRepository;
pub use service::CategoryService;
