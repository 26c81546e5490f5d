//! MongoDB implementation of CategoryRepository

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use database::mongodb::is_duplicate_key;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, UpdateCategory};
use crate::repository::CategoryRepository;

pub struct MongoCategoryRepository {
    collection: Collection<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Category>("categories"),
        }
    }

    /// Unique index that enforces one category per name.
    pub async fn init_indexes(&self) -> CategoryResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_name_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Category indexes created successfully");
        Ok(())
    }
}

/// `$set` of the supplied fields plus `updated_at`.
fn update_document(update: &UpdateCategory, now: DateTime<Utc>) -> Document {
    let mut set = doc! { "updated_at": now.to_rfc3339_opts(SecondsFormat::AutoSi, true) };
    if let Some(name) = &update.name {
        set.insert("name", name.as_str());
    }
    if let Some(description) = &update.description {
        set.insert("description", description.as_str());
    }
    doc! { "$set": set }
}

fn map_write_error(err: mongodb::error::Error, name: &str) -> CategoryError {
    if is_duplicate_key(&err) {
        CategoryError::DuplicateName(name.to_string())
    } else {
        CategoryError::Storage(err)
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    #[instrument(skip(self, category), fields(name = %category.name))]
    async fn create(&self, category: Category) -> CategoryResult<Category> {
        self.collection
            .insert_one(&category)
            .await
            .map_err(|e| map_write_error(e, &category.name))?;

        tracing::info!(category_id = %category.id, "Category created successfully");
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> CategoryResult<Option<Category>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> CategoryResult<Vec<Category>> {
        let cursor = self.collection.find(doc! {}).sort(doc! { "name": 1 }).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: ObjectId, update: UpdateCategory) -> CategoryResult<Option<Category>> {
        let category = self
            .collection
            .find_one_and_update(doc! { "_id": id }, update_document(&update, Utc::now()))
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| map_write_error(e, update.name.as_deref().unwrap_or_default()))?;

        if category.is_some() {
            tracing::info!(category_id = %id, "Category updated successfully");
        }
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> CategoryResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_update_document_sets_only_supplied_fields() {
        let update = UpdateCategory {
            description: Some("Hand tools".into()),
            ..Default::default()
        };
        let document = update_document(&update, fixed_now());

        assert_eq!(document.len(), 1);
        let set = document.get_document("$set").unwrap();
        assert_eq!(set.get_str("description").unwrap(), "Hand tools");
        assert_eq!(set.get_str("updated_at").unwrap(), "2024-05-01T12:00:00Z");
        assert!(!set.contains_key("name"));
        assert!(!set.contains_key("created_at"));
    }

    #[test]
    fn test_updated_at_matches_stored_form() {
        let now = fixed_now();
        let set = update_document(&UpdateCategory::default(), now)
            .get_document("$set")
            .unwrap()
            .clone();
        let serialized = serde_json::to_value(now).unwrap();
        assert_eq!(set.get_str("updated_at").unwrap(), serialized.as_str().unwrap());
    }
}
