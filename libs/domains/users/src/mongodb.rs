//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use database::mongodb::is_duplicate_key;
use mongodb::{
    bson::doc,
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<User>("users"),
        }
    }

    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_email_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "verification_token": 1 })
                .options(
                    IndexOptions::builder()
                        .sparse(true)
                        .name("idx_verification_token".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "reset_token": 1 })
                .options(
                    IndexOptions::builder()
                        .sparse(true)
                        .name("idx_reset_token".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> UserResult<User> {
        self.collection.insert_one(&user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                UserError::DuplicateEmail(user.email.clone())
            } else {
                UserError::Storage(e)
            }
        })?;
        Ok(user)
    }

    #[instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip(self, token))]
    async fn find_by_verification_token(&self, token: &str) -> UserResult<Option<User>> {
        Ok(self
            .collection
            .find_one(doc! { "verification_token": token })
            .await?)
    }

    #[instrument(skip(self, token))]
    async fn find_by_reset_token(&self, token: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "reset_token": token }).await?)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> UserResult<bool> {
        let result = self
            .collection
            .replace_one(doc! { "_id": user.id }, user)
            .await?;
        Ok(result.matched_count > 0)
    }
}
