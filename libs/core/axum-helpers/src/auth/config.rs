//! Auth settings loaded through `core_config::FromEnv`.

use core_config::{ConfigError, FromEnv, env_parse_or, env_required};

const MIN_SECRET_LEN: usize = 32;

/// Signing settings for access tokens.
///
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_ACCESS_TTL_SECS` (default: 86400)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_secs: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, access_ttl_secs: i64) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least {MIN_SECRET_LEN} characters (got {})",
                    secret.len()
                ),
            });
        }
        Ok(Self {
            secret,
            access_ttl_secs,
        })
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::new(
            env_required("JWT_SECRET")?,
            env_parse_or("JWT_ACCESS_TTL_SECS", 86_400)?,
        )
    }
}

/// Shared key that service callers send in `X-API-Key`.
///
/// - `SERVICE_API_KEY` (required, non-empty)
#[derive(Clone)]
pub struct ServiceKeyConfig {
    pub api_key: String,
}

impl std::fmt::Debug for ServiceKeyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceKeyConfig")
            .field("api_key", &"***")
            .finish()
    }
}

impl FromEnv for ServiceKeyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_required("SERVICE_API_KEY")?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::ParseError {
                key: "SERVICE_API_KEY".to_string(),
                details: "must not be empty".to_string(),
            });
        }
        Ok(Self { api_key })
    }
}
