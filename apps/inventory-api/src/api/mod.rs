//! API routes module

pub mod categories;
pub mod health;
pub mod products;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Create all routes mounted under `/api`
pub fn routes(state: &AppState) -> eyre::Result<Router> {
    Ok(Router::new()
        .nest("/products", products::router(state)?)
        .nest("/stocks", products::stock_router(state))
        .nest("/categories", categories::router(state))
        .nest("/users", users::router(state)?))
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    products::init_indexes(state).await?;
    categories::init_indexes(state).await?;
    users::init_indexes(state).await
}
