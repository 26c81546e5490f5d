//! Request authentication.
//!
//! Two independent mechanisms guard the API:
//! - bearer JWTs for people, checked by [`jwt_auth_middleware`], with
//!   [`AuthUser`] / [`AdminUser`] extractors for role checks
//! - a shared service key in `X-API-Key` for machine callers, checked by
//!   [`service_key_middleware`]

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod roles;
pub mod service_key;

pub use config::{JwtConfig, ServiceKeyConfig};
pub use jwt::{AuthError, IssuedToken, JwtAuth, JwtClaims};
pub use middleware::jwt_auth_middleware;
pub use roles::{AdminUser, AuthUser, Role};
pub use service_key::{SERVICE_KEY_HEADER, service_key_middleware};
