//! Product and stock routes

use axum::{middleware::from_fn_with_state, Router};
use axum_helpers::{jwt_auth_middleware, service_key_middleware};
use domain_products::{
    handlers, CloudinaryUploader, MongoProductRepository, MongoStockRepository, ProductService,
    StockService,
};
use std::sync::Arc;

use crate::state::AppState;

/// Catalog routes, bearer token required
pub fn router(state: &AppState) -> eyre::Result<Router> {
    let repository = MongoProductRepository::new(&state.db);
    let uploader = CloudinaryUploader::new(state.config.cloudinary.clone())?;
    let service = ProductService::new(repository, Arc::new(uploader));

    Ok(handlers::router(service)
        .layer(from_fn_with_state(state.jwt.clone(), jwt_auth_middleware)))
}

/// Bulk stock routes, service key required
pub fn stock_router(state: &AppState) -> Router {
    let service = StockService::new(MongoStockRepository::new(&state.db));

    handlers::stock_router(service).layer(from_fn_with_state(
        state.config.service_key.clone(),
        service_key_middleware,
    ))
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    let repository = MongoProductRepository::new(&state.db);
    repository.init_indexes().await?;
    Ok(())
}
