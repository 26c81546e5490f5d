//! Products domain: catalog CRUD, filtered listing and bulk stock updates.
//!
//! ```text
//! handlers ──► ProductService ──► ProductRepository ──► MongoProductRepository
//!          └─► StockService   ──► StockRepository   ──► MongoStockRepository
//!                  ProductService ──► ImageUploader ──► CloudinaryUploader
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     handlers, CloudinaryConfig, CloudinaryUploader, MongoProductRepository,
//!     MongoStockRepository, ProductService, StockService,
//! };
//! use core_config::FromEnv;
//! use std::sync::Arc;
//!
//! # async fn example(db: mongodb::Database) -> Result<(), Box<dyn std::error::Error>> {
//! let uploader = CloudinaryUploader::new(CloudinaryConfig::from_env()?)?;
//! let products = ProductService::new(MongoProductRepository::new(&db), Arc::new(uploader));
//! let stock = StockService::new(MongoStockRepository::new(&db));
//!
//! let router = axum::Router::new()
//!     .nest("/products", handlers::router(products))
//!     .nest("/stocks", handlers::stock_router(stock));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod query;
pub mod repository;
pub mod service;
pub mod stock;
pub mod upload;

pub use error::{ProductError, ProductResult};
pub use handlers::{ApiDoc, StockApiDoc};
pub use models::{CreateProduct, ImageUpload, Product, ProductResponse, UpdateProduct};
pub use mongodb::{MongoProductRepository, MongoStockRepository};
pub use query::{Page, Pagination, ProductFilter, ProductQuery, ProductSort, SortField, SortOrder};
pub use repository::{ProductRepository, StockRepository};
pub use service::ProductService;
pub use stock::{
    plan_adjustments, BulkStockUpdateRequest, StockAdjustment, StockService, StockUpdateItem,
    StockWriteSummary,
};
pub use upload::{CloudinaryConfig, CloudinaryUploader, ImageUploader};
