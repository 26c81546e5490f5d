//! Public account routes

use axum::Router;
use domain_users::{handlers, MongoUserRepository, SmtpMailer, UserService};
use std::sync::Arc;

use crate::state::AppState;

pub fn router(state: &AppState) -> eyre::Result<Router> {
    let mailer = SmtpMailer::new(state.config.smtp.clone())?;
    let service = UserService::new(
        MongoUserRepository::new(&state.db),
        Arc::new(mailer),
        state.jwt.clone(),
    );

    Ok(handlers::router(service))
}

pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoUserRepository::new(&state.db).init_indexes().await?;
    Ok(())
}
