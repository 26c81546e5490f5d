//! Configuration for the Inventory API

use axum_helpers::{CorsConfig, JwtConfig, ServiceKeyConfig};
use core_config::{app_info, env_parse_or, server::ServerConfig, AppInfo, FromEnv};
use database::mongodb::MongoConfig;
use domain_products::CloudinaryConfig;
use domain_users::SmtpConfig;
use std::time::Duration;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
    pub service_key: ServiceKeyConfig,
    pub cors: CorsConfig,
    pub smtp: SmtpConfig,
    pub cloudinary: CloudinaryConfig,
    /// `REQUEST_TIMEOUT_SECS` (default: 30)
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let request_timeout_secs: u64 = env_parse_or("REQUEST_TIMEOUT_SECS", 30)?;

        Ok(Self {
            app: app_info!(),
            environment,
            server: ServerConfig::from_env()?,
            mongodb: MongoConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            service_key: ServiceKeyConfig::from_env()?,
            cors: CorsConfig::from_env()?,
            smtp: SmtpConfig::from_env()?,
            cloudinary: CloudinaryConfig::from_env()?,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}
