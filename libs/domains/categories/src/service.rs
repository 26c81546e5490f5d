use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CategoryResponse, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;

/// Category CRUD. Deleting a category leaves products that reference it
/// untouched.
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(&self, input: CreateCategory) -> CategoryResult<CategoryResponse> {
        input.validate()?;
        let category = self.repository.create(Category::new(input)).await?;
        Ok(category.into())
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: ObjectId) -> CategoryResult<CategoryResponse> {
        self.repository
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| CategoryError::NotFound(id.to_hex()))
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> CategoryResult<Vec<CategoryResponse>> {
        let categories = self.repository.list().await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        id: ObjectId,
        input: UpdateCategory,
    ) -> CategoryResult<CategoryResponse> {
        input.validate()?;
        if input.name.is_none() && input.description.is_none() {
            return Err(CategoryError::Validation("No fields to update".to_string()));
        }

        self.repository
            .update(id, input)
            .await?
            .map(Into::into)
            .ok_or_else(|| CategoryError::NotFound(id.to_hex()))
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: ObjectId) -> CategoryResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CategoryError::NotFound(id.to_hex()));
        }
        Ok(())
    }
}
