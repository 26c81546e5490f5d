//! Bulk stock adjustment.
//!
//! A request batch is decoded and collapsed into at most one `$inc` per
//! product, then handed to the [`StockRepository`] as a single ordered
//! write. Nothing reaches the store if any identifier fails to decode.

use std::collections::HashMap;
use std::sync::Arc;

use database::mongodb::parse_object_id;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::ProductResult;
use crate::repository::StockRepository;

/// One line of a bulk update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct StockUpdateItem {
    #[validate(length(min = 1))]
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub product_id: String,
    pub quantity: u32,
    /// `true` adds `quantity`, `false` subtracts it
    #[serde(default)]
    pub increment: bool,
}

impl StockUpdateItem {
    pub fn delta(&self) -> i64 {
        let quantity = i64::from(self.quantity);
        if self.increment { quantity } else { -quantity }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BulkStockUpdateRequest {
    #[validate(nested)]
    pub products: Vec<StockUpdateItem>,
}

/// A decoded, signed stock change for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAdjustment {
    pub id: ObjectId,
    pub delta: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StockWriteSummary {
    /// Products that exist for the submitted ids
    pub matched: u64,
    pub modified: u64,
}

/// Decoded batch ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentPlan {
    pub adjustments: Vec<StockAdjustment>,
    /// Items dropped because a later item targeted the same product
    pub collapsed: usize,
}

/// Decode every id, then collapse duplicates.
///
/// A repeated product keeps the delta of its last occurrence and the
/// position of its first, so the write order follows the request.
pub fn plan_adjustments(items: &[StockUpdateItem]) -> ProductResult<AdjustmentPlan> {
    let decoded = items
        .iter()
        .map(|item| -> ProductResult<(ObjectId, i64)> {
            Ok((parse_object_id(&item.product_id)?, item.delta()))
        })
        .collect::<ProductResult<Vec<_>>>()?;

    let mut position: HashMap<ObjectId, usize> = HashMap::with_capacity(decoded.len());
    let mut adjustments: Vec<StockAdjustment> = Vec::with_capacity(decoded.len());

    for (id, delta) in decoded {
        match position.get(&id) {
            Some(&at) => adjustments[at].delta = delta,
            None => {
                position.insert(id, adjustments.len());
                adjustments.push(StockAdjustment { id, delta });
            }
        }
    }

    let collapsed = items.len() - adjustments.len();
    Ok(AdjustmentPlan {
        adjustments,
        collapsed,
    })
}

pub struct StockService<S: StockRepository> {
    store: Arc<S>,
}

impl<S: StockRepository> StockService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Apply a batch of stock changes in one store round trip.
    ///
    /// Stock may go below zero; no floor is enforced here. A failed write
    /// is returned as-is and never retried.
    #[instrument(skip(self, items), fields(batch_size = items.len(), collapsed = tracing::field::Empty))]
    pub async fn bulk_adjust(&self, items: &[StockUpdateItem]) -> ProductResult<StockWriteSummary> {
        let plan = plan_adjustments(items)?;
        tracing::Span::current().record("collapsed", plan.collapsed as u64);

        if plan.adjustments.is_empty() {
            tracing::debug!("empty stock batch, nothing to write");
            return Ok(StockWriteSummary::default());
        }

        let summary = self.store.apply_adjustments(plan.adjustments).await?;
        tracing::info!(
            matched = summary.matched,
            modified = summary.modified,
            "stock batch applied"
        );
        Ok(summary)
    }
}
