//! MongoDB implementations of [`ProductRepository`] and [`StockRepository`].

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, UpdateProduct};
use crate::query::{Pagination, ProductFilter, ProductSort};
use crate::repository::{ProductRepository, StockRepository};
use crate::stock::{StockAdjustment, StockWriteSummary};

pub const PRODUCTS_COLLECTION: &str = "products";

pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Product>(collection_name),
        }
    }

    /// Indexes backing the listing filters and sorts.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = |keys: Document, name: &str| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        };

        let indexes = vec![
            index(doc! { "name": 1 }, "idx_name"),
            index(doc! { "category": 1, "created_at": -1 }, "idx_category"),
            index(doc! { "price": 1 }, "idx_price"),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_name = %product.name))]
    async fn create(&self, product: Product) -> ProductResult<Product> {
        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn find_page(
        &self,
        filter: ProductFilter,
        sort: Option<ProductSort>,
        pagination: Pagination,
    ) -> ProductResult<(Vec<Product>, u64)> {
        let mongo_filter = filter.to_document();

        let total = self.collection.count_documents(mongo_filter.clone()).await?;

        let mut find = self.collection.find(mongo_filter);
        if let Some(sort) = sort {
            find = find.sort(sort.to_document());
        }
        if let Some(limit) = pagination.limit {
            find = find.skip(pagination.skip()).limit(limit as i64);
        }

        let products: Vec<Product> = find.await?.try_collect().await?;
        Ok((products, total))
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: ObjectId, update: UpdateProduct) -> ProductResult<Option<Product>> {
        let product = self
            .collection
            .find_one_and_update(doc! { "_id": id }, update_document(&update, Utc::now()))
            .return_document(ReturnDocument::After)
            .await?;

        if product.is_some() {
            tracing::info!(product_id = %id, "Product updated successfully");
        }
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> ProductResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }
}

/// Bulk `$inc` writer for the stock engine.
///
/// Sends one ordered `update` command carrying every adjustment, which
/// every supported server version accepts as a single round trip.
pub struct MongoStockRepository {
    db: Database,
    collection_name: String,
}

impl MongoStockRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            db: db.clone(),
            collection_name: collection_name.to_string(),
        }
    }
}

#[async_trait]
impl StockRepository for MongoStockRepository {
    #[instrument(skip(self, adjustments), fields(count = adjustments.len()))]
    async fn apply_adjustments(
        &self,
        adjustments: Vec<StockAdjustment>,
    ) -> ProductResult<StockWriteSummary> {
        let command = update_command(&self.collection_name, &adjustments, Utc::now());
        let reply = self.db.run_command(command).await?;
        summarize_reply(&reply)
    }
}

/// Same string form serde gives `DateTime<Utc>` on the stored document.
fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// `$set` of the supplied fields plus `updated_at`. `stock` is only
/// written when the caller supplied it.
fn update_document(update: &UpdateProduct, now: DateTime<Utc>) -> Document {
    let mut set = doc! { "updated_at": timestamp(now) };
    if let Some(name) = &update.name {
        set.insert("name", name.as_str());
    }
    if let Some(description) = &update.description {
        set.insert("description", description.as_str());
    }
    if let Some(category) = &update.category {
        set.insert("category", category.as_str());
    }
    if let Some(price) = update.price {
        set.insert("price", price);
    }
    if let Some(stock) = update.stock {
        set.insert("stock", stock);
    }
    if let Some(image_url) = &update.image_url {
        set.insert("image_url", image_url.as_str());
    }
    doc! { "$set": set }
}

fn update_command(
    collection: &str,
    adjustments: &[StockAdjustment],
    now: DateTime<Utc>,
) -> Document {
    let updated_at = timestamp(now);
    let updates: Vec<Document> = adjustments
        .iter()
        .map(|a| {
            doc! {
                "q": { "_id": a.id },
                "u": {
                    "$inc": { "stock": a.delta },
                    "$set": { "updated_at": updated_at.as_str() },
                },
            }
        })
        .collect();

    doc! {
        "update": collection,
        "updates": updates,
        "ordered": true,
    }
}

fn summarize_reply(reply: &Document) -> ProductResult<StockWriteSummary> {
    if let Ok(errors) = reply.get_array("writeErrors") {
        if let Some(Bson::Document(first)) = errors.first() {
            let message = first.get_str("errmsg").unwrap_or("unknown write error");
            tracing::error!(errors = errors.len(), "stock batch rejected: {}", message);
            return Err(ProductError::WriteRejected(message.to_string()));
        }
    }

    if let Ok(concern) = reply.get_document("writeConcernError") {
        let message = concern.get_str("errmsg").unwrap_or("write concern not satisfied");
        tracing::error!("stock batch write concern error: {}", message);
        return Err(ProductError::WriteRejected(message.to_string()));
    }

    Ok(StockWriteSummary {
        matched: count_field(reply, "n"),
        modified: count_field(reply, "nModified"),
    })
}

fn count_field(reply: &Document, key: &str) -> u64 {
    match reply.get(key) {
        Some(Bson::Int32(n)) => (*n).max(0) as u64,
        Some(Bson::Int64(n)) => (*n).max(0) as u64,
        Some(Bson::Double(n)) if *n > 0.0 => *n as u64,
        _ => 0,
    }
}
