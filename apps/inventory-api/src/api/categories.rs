//! Category routes

use axum::{middleware::from_fn_with_state, Router};
use axum_helpers::jwt_auth_middleware;
use domain_categories::{handlers, CategoryService, MongoCategoryRepository};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let service = CategoryService::new(MongoCategoryRepository::new(&state.db));

    handlers::router(service).layer(from_fn_with_state(state.jwt.clone(), jwt_auth_middleware))
}

pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoCategoryRepository::new(&state.db).init_indexes().await?;
    Ok(())
}
