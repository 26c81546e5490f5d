use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::ProductResult;
use crate::models::{Product, UpdateProduct};
use crate::query::{Pagination, ProductFilter, ProductSort};
use crate::stock::{StockAdjustment, StockWriteSummary};

/// Product persistence used by the CRUD and listing paths.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: Product) -> ProductResult<Product>;

    async fn find_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>>;

    /// Matching products for one page, plus the count of all matches.
    async fn find_page(
        &self,
        filter: ProductFilter,
        sort: Option<ProductSort>,
        pagination: Pagination,
    ) -> ProductResult<(Vec<Product>, u64)>;

    /// Apply the set fields; `None` when no product has this id.
    async fn update(&self, id: ObjectId, update: UpdateProduct) -> ProductResult<Option<Product>>;

    /// `true` when a document was removed.
    async fn delete(&self, id: ObjectId) -> ProductResult<bool>;
}

/// Write side of the bulk stock engine.
///
/// Implementations submit every adjustment in one ordered round trip and
/// never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockRepository: Send + Sync {
    async fn apply_adjustments(
        &self,
        adjustments: Vec<StockAdjustment>,
    ) -> ProductResult<StockWriteSummary>;
}
