use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::CategoryResult;
use crate::models::{Category, UpdateCategory};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Fails with `DuplicateName` when the name is taken.
    async fn create(&self, category: Category) -> CategoryResult<Category>;

    async fn find_by_id(&self, id: ObjectId) -> CategoryResult<Option<Category>>;

    /// All categories ordered by name.
    async fn list(&self) -> CategoryResult<Vec<Category>>;

    async fn update(&self, id: ObjectId, update: UpdateCategory) -> CategoryResult<Option<Category>>;

    async fn delete(&self, id: ObjectId) -> CategoryResult<bool>;
}
