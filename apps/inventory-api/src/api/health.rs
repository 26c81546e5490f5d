//! Readiness endpoint

use axum::{extract::State, response::Response, routing::get, Router};
use axum_helpers::{run_health_checks, HealthCheckFuture};
use mongodb::Client;

async fn ready(State(client): State<Client>) -> Response {
    let mongodb: HealthCheckFuture<'_> = Box::pin(async move {
        if database::mongodb::check_health(&client).await {
            Ok(())
        } else {
            Err("ping failed".to_string())
        }
    });

    run_health_checks(vec![("mongodb", mongodb)]).await
}

/// `/ready` pings MongoDB; `/health` comes from `axum_helpers::health_router`.
pub fn ready_router(client: Client) -> Router {
    Router::new().route("/ready", get(ready)).with_state(client)
}
