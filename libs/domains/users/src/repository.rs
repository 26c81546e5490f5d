use async_trait::async_trait;

use crate::error::UserResult;
use crate::models::User;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DuplicateEmail` when the email is taken.
    async fn create(&self, user: User) -> UserResult<User>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn find_by_verification_token(&self, token: &str) -> UserResult<Option<User>>;

    async fn find_by_reset_token(&self, token: &str) -> UserResult<Option<User>>;

    /// Replace the stored document; `false` when the user no longer exists.
    async fn update(&self, user: &User) -> UserResult<bool>;
}
