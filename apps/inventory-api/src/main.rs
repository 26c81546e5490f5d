//! Inventory API - catalog, categories, accounts and bulk stock REST server

use axum_helpers::{create_router, health_router, serve, JwtAuth};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());

    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;

    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    let state = AppState {
        jwt: JwtAuth::new(&config.jwt),
        config,
        mongo_client,
        db,
    };

    api::init_indexes(&state).await?;

    let api_routes = api::routes(&state)?;
    let app = create_router::<openapi::ApiDoc>(
        api_routes,
        &state.config.cors,
        state.config.request_timeout,
    )
    .merge(health_router(state.config.app.clone()))
    .merge(api::health::ready_router(state.mongo_client.clone()));

    info!(
        "Starting {} on port {}",
        state.config.app.name, state.config.server.port
    );

    let mongo_client = state.mongo_client.clone();
    serve(app, &state.config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing MongoDB connections");
        mongo_client.shutdown().await;
        info!("MongoDB connection closed");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Inventory API shutdown complete");
    Ok(())
}
