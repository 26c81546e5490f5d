//! Users domain: account registration, login and password recovery.
//!
//! Passwords are hashed with Argon2; login issues the shared JWT from
//! `axum_helpers`. Verification and reset links go out through a [`Mailer`].

pub mod error;
pub mod handlers;
pub mod mailer;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use mailer::{Mailer, SmtpConfig, SmtpMailer};
pub use models::{LoginRequest, LoginResponse, RegisterRequest, User, UserResponse};
pub use mongodb::MongoUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
