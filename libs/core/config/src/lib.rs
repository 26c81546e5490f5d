//! Environment-driven configuration shared by every inventory crate.
//!
//! Each component owns a struct that implements [`FromEnv`]; the binary
//! composes them at startup and fails fast on the first missing or
//! malformed variable.

pub mod server;
pub mod tracing;

use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Deployment flavour, read from `APP_ENV`. Anything other than
/// `production` (any case) is development.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        match env::var("APP_ENV") {
            Ok(value) if value.eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Static identity of the running binary, used by health endpoints and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Build an [`AppInfo`] from the calling crate's Cargo metadata.
#[macro_export]
macro_rules! app_info {
    () => {
        $crate::AppInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    };
}

pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Load an environment variable and parse it, falling back to `default` when unset.
pub fn env_parse_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_is_development_unless_production() {
        temp_env::with_var_unset("APP_ENV", || {
            assert_eq!(Environment::from_env(), Environment::Development);
        });
        temp_env::with_var("APP_ENV", Some("staging"), || {
            assert_eq!(Environment::from_env(), Environment::Development);
        });
        for value in ["production", "PRODUCTION", "Production"] {
            temp_env::with_var("APP_ENV", Some(value), || {
                assert!(Environment::from_env().is_production());
            });
        }
    }

    #[test]
    fn env_or_default_prefers_the_variable() {
        temp_env::with_var("INVENTORY_FOLDER", Some("catalog"), || {
            assert_eq!(env_or_default("INVENTORY_FOLDER", "products"), "catalog");
        });
        temp_env::with_var_unset("INVENTORY_FOLDER", || {
            assert_eq!(env_or_default("INVENTORY_FOLDER", "products"), "products");
        });
    }

    #[test]
    fn env_required_names_the_missing_key() {
        temp_env::with_var_unset("SMTP_HOST", || {
            let err = env_required("SMTP_HOST").unwrap_err();
            assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "SMTP_HOST"));
        });
        temp_env::with_var("SMTP_HOST", Some("mail.local"), || {
            assert_eq!(env_required("SMTP_HOST").unwrap(), "mail.local");
        });
    }

    #[test]
    fn app_info_uses_crate_metadata() {
        let info = app_info!();
        assert_eq!(info.name, "core_config");
        assert!(!info.version.is_empty());
    }

    #[test]
    fn env_parse_or_trims_and_defaults() {
        temp_env::with_var_unset("REQUEST_TIMEOUT_SECS", || {
            assert_eq!(env_parse_or("REQUEST_TIMEOUT_SECS", 30u64).unwrap(), 30);
        });
        temp_env::with_var("REQUEST_TIMEOUT_SECS", Some(" 7 "), || {
            assert_eq!(env_parse_or("REQUEST_TIMEOUT_SECS", 30u64).unwrap(), 7);
        });
    }

    #[test]
    fn env_parse_or_rejects_garbage() {
        temp_env::with_var("REQUEST_TIMEOUT_SECS", Some("seven"), || {
            let err = env_parse_or("REQUEST_TIMEOUT_SECS", 30u64).unwrap_err();
            assert!(
                matches!(err, ConfigError::ParseError { ref key, .. } if key == "REQUEST_TIMEOUT_SECS")
            );
        });
    }
}
