//! # Axum Helpers
//!
//! Shared HTTP plumbing for the inventory services.
//!
//! - **[`auth`]**: JWT bearer auth, role extractors, service-key guard
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: the JSON error envelope and [`ErrorCode`]s
//! - **[`extractors`]**: [`ObjectIdPath`], [`ValidatedJson`], [`ValidatedQuery`]

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    AdminUser, AuthUser, IssuedToken, JwtAuth, JwtClaims, JwtConfig, Role, ServiceKeyConfig,
    jwt_auth_middleware, service_key_middleware,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_router, health_router,
    run_health_checks, serve, shutdown_signal,
};

pub use http::{CorsConfig, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse, error_response};

pub use extractors::{ObjectIdPath, ValidatedJson, ValidatedQuery};
