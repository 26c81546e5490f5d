//! MongoDB client setup, health probes and identifier handling.

mod config;
mod connector;
mod errors;
mod health;
pub mod object_id;

pub use config::MongoConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use errors::{DUPLICATE_KEY_CODE, is_duplicate_key, is_serialization, is_unavailable};
pub use health::{HealthStatus, check_health, check_health_detailed};
pub use object_id::{InvalidObjectId, parse_object_id};

pub use mongodb::{Client, Collection, Database};
