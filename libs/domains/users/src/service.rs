use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::JwtAuth;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::mailer::Mailer;
use crate::models::{
    LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest, User, UserResponse,
};
use crate::repository::UserRepository;

/// How long a password reset token stays valid.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// Registration, login, email verification and password reset.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    mailer: Arc<dyn Mailer>,
    jwt: JwtAuth,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, mailer: Arc<dyn Mailer>, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            mailer,
            jwt,
        }
    }

    /// Create an unverified account and mail its verification link.
    ///
    /// A mail failure is logged; the account is still created.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterRequest) -> UserResult<UserResponse> {
        input.validate()?;

        let email = normalize_email(&input.email);
        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(UserError::DuplicateEmail(email));
        }

        let token = new_token();
        let user = User::new(email, hash_password(&input.password)?, token.clone());
        let user = self.repository.create(user).await?;

        if let Err(e) = self.mailer.send_verification_email(&user.email, &token).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to send verification email");
        }

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user.into())
    }

    #[instrument(skip(self, input))]
    pub async fn login(&self, input: LoginRequest) -> UserResult<LoginResponse> {
        let email = normalize_email(&input.email);
        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        if !user.is_verified {
            return Err(UserError::EmailNotVerified);
        }

        let issued = self
            .jwt
            .create_access_token(&user.id.to_hex(), &user.email, &[user.role])
            .map_err(|e| UserError::TokenSigning(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse {
            access_token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
        })
    }

    #[instrument(skip(self, token))]
    pub async fn verify_email(&self, token: &str) -> UserResult<()> {
        let mut user = self
            .repository
            .find_by_verification_token(token)
            .await?
            .ok_or(UserError::InvalidToken)?;

        user.is_verified = true;
        user.verification_token = None;
        user.updated_at = Utc::now();
        self.repository.update(&user).await?;

        tracing::info!(user_id = %user.id, "Email verified");
        Ok(())
    }

    /// Issue a reset token when the account exists. Callers get the same
    /// answer either way.
    #[instrument(skip(self, email))]
    pub async fn request_password_reset(&self, email: &str) -> UserResult<()> {
        let email = normalize_email(email);
        let Some(mut user) = self.repository.find_by_email(&email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = new_token();
        user.reset_token = Some(token.clone());
        user.reset_token_expires_at = Some(Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES));
        user.updated_at = Utc::now();
        self.repository.update(&user).await?;

        if let Err(e) = self.mailer.send_password_reset_email(&user.email, &token).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to send password reset email");
        }
        Ok(())
    }

    #[instrument(skip(self, token, input))]
    pub async fn reset_password(&self, token: &str, input: ResetPasswordRequest) -> UserResult<()> {
        input.validate()?;

        let mut user = self
            .repository
            .find_by_reset_token(token)
            .await?
            .ok_or(UserError::InvalidToken)?;

        match user.reset_token_expires_at {
            Some(expires_at) if expires_at > Utc::now() => {}
            _ => return Err(UserError::InvalidToken),
        }

        user.password_hash = hash_password(&input.new_password)?;
        user.reset_token = None;
        user.reset_token_expires_at = None;
        user.updated_at = Utc::now();
        self.repository.update(&user).await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MockMailer;
    use crate::repository::MockUserRepository;
    use axum_helpers::JwtConfig;

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("user-service-tests-secret-32-chars!!", 900).unwrap())
    }

    fn verified_user(password: &str) -> User {
        let mut user = User::new(
            "ada@example.com".into(),
            hash_password(password).unwrap(),
            "t".into(),
        );
        user.is_verified = true;
        user.verification_token = None;
        user
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_survives_mail_failure() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|u| u.email == "ada@example.com" && !u.is_verified && u.verification_token.is_some())
            .returning(|u| Ok(u));

        let mut mailer = MockMailer::new();
        mailer
            .expect_send_verification_email()
            .times(1)
            .returning(|_, _| Err(eyre::eyre!("smtp down")));

        let service = UserService::new(repo, Arc::new(mailer), jwt());
        let user = service
            .register(RegisterRequest {
                email: "  Ada@Example.com ".into(),
                password: "long-enough".into(),
            })
            .await
            .unwrap();

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.role, "user");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(verified_user("whatever1"))));
        repo.expect_create().never();

        let service = UserService::new(repo, Arc::new(MockMailer::new()), jwt());
        let result = service
            .register(RegisterRequest {
                email: "ada@example.com".into(),
                password: "long-enough".into(),
            })
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let service = UserService::new(repo, Arc::new(MockMailer::new()), jwt());
        let result = service
            .register(RegisterRequest {
                email: "ada@example.com".into(),
                password: "short".into(),
            })
            .await;
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_issues_bearer_token_with_role() {
        let auth = jwt();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(verified_user("s3cure-pass"))));

        let service = UserService::new(repo, Arc::new(MockMailer::new()), auth.clone());
        let response = service
            .login(LoginRequest {
                email: "ada@example.com".into(),
                password: "s3cure-pass".into(),
            })
            .await
            .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 900);
        let claims = auth.verify_token(&response.access_token).unwrap();
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.roles, vec!["user".to_string()]);
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_user_look_the_same() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| {
                if email == "ada@example.com" {
                    Ok(Some(verified_user("s3cure-pass")))
                } else {
                    Ok(None)
                }
            });

        let service = UserService::new(repo, Arc::new(MockMailer::new()), jwt());
        for email in ["ada@example.com", "nobody@example.com"] {
            let result = service
                .login(LoginRequest {
                    email: email.into(),
                    password: "wrong-pass".into(),
                })
                .await;
            assert!(matches!(result, Err(UserError::InvalidCredentials)));
        }
    }

    #[tokio::test]
    async fn test_login_unverified_is_rejected() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| {
            let mut user = verified_user("s3cure-pass");
            user.is_verified = false;
            Ok(Some(user))
        });

        let service = UserService::new(repo, Arc::new(MockMailer::new()), jwt());
        let result = service
            .login(LoginRequest {
                email: "ada@example.com".into(),
                password: "s3cure-pass".into(),
            })
            .await;
        assert!(matches!(result, Err(UserError::EmailNotVerified)));
    }

    #[tokio::test]
    async fn test_verify_email_unknown_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_verification_token().returning(|_| Ok(None));
        repo.expect_update().never();

        let service = UserService::new(repo, Arc::new(MockMailer::new()), jwt());
        assert!(matches!(
            service.verify_email("nope").await,
            Err(UserError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_password_reset_request_for_unknown_email_is_silent() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_update().never();

        let mut mailer = MockMailer::new();
        mailer.expect_send_password_reset_email().never();

        let service = UserService::new(repo, Arc::new(mailer), jwt());
        assert!(service.request_password_reset("ghost@example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_password_reset_request_sets_one_hour_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(verified_user("s3cure-pass"))));
        repo.expect_update()
            .withf(|u| {
                let Some(expires) = u.reset_token_expires_at else {
                    return false;
                };
                let remaining = expires - Utc::now();
                u.reset_token.is_some()
                    && remaining <= Duration::minutes(60)
                    && remaining > Duration::minutes(59)
            })
            .times(1)
            .returning(|_| Ok(true));

        let mut mailer = MockMailer::new();
        mailer
            .expect_send_password_reset_email()
            .times(1)
            .returning(|_, _| Ok(()));

        let service = UserService::new(repo, Arc::new(mailer), jwt());
        service.request_password_reset("ADA@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn test_reset_password_expired_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_reset_token().returning(|_| {
            let mut user = verified_user("s3cure-pass");
            user.reset_token = Some("tok".into());
            user.reset_token_expires_at = Some(Utc::now() - Duration::minutes(1));
            Ok(Some(user))
        });
        repo.expect_update().never();

        let service = UserService::new(repo, Arc::new(MockMailer::new()), jwt());
        let result = service
            .reset_password(
                "tok",
                ResetPasswordRequest {
                    new_password: "brand-new-pass".into(),
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_reset_password_clears_token_and_rehashes() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_reset_token().returning(|_| {
            let mut user = verified_user("s3cure-pass");
            user.reset_token = Some("tok".into());
            user.reset_token_expires_at = Some(Utc::now() + Duration::minutes(30));
            Ok(Some(user))
        });
        repo.expect_update()
            .withf(|u| {
                u.reset_token.is_none()
                    && u.reset_token_expires_at.is_none()
                    && verify_password("brand-new-pass", &u.password_hash).unwrap()
            })
            .times(1)
            .returning(|_| Ok(true));

        let service = UserService::new(repo, Arc::new(MockMailer::new()), jwt());
        service
            .reset_password(
                "tok",
                ResetPasswordRequest {
                    new_password: "brand-new-pass".into(),
                },
            )
            .await
            .unwrap();
    }
}
