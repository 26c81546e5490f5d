#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Response;
use domain_products::{
    CreateProduct, ImageUpload, ImageUploader, Pagination, Product, ProductError, ProductFilter,
    ProductRepository, ProductResult, ProductSort, SortField, SortOrder, StockAdjustment,
    StockRepository, StockWriteSummary, UpdateProduct,
};
use http_body_util::BodyExt;
use mongodb::bson::oid::ObjectId;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

/// Products held in memory; clones share state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    products: Arc<Mutex<Vec<Product>>>,
    stock_batches: Arc<Mutex<Vec<Vec<StockAdjustment>>>>,
    fail_writes: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: &str, category: &str, price: f64, stock: i64) -> ObjectId {
        let product = Product::new(
            CreateProduct {
                name: name.to_string(),
                description: String::new(),
                category: category.to_string(),
                price,
                stock,
            },
            String::new(),
        );
        let id = product.id;
        self.products.lock().unwrap().push(product);
        id
    }

    pub fn stock_of(&self, id: ObjectId) -> Option<i64> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.stock)
    }

    /// Batches received by `apply_adjustments`, in call order.
    pub fn stock_batches(&self) -> Vec<Vec<StockAdjustment>> {
        self.stock_batches.lock().unwrap().clone()
    }

    /// Make the next stock write fail as an unreachable store would.
    pub fn fail_next_write(&self) {
        self.fail_writes.fetch_add(1, AtomicOrdering::SeqCst);
    }
}

fn compare(a: &Product, b: &Product, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Price => a.price.total_cmp(&b.price),
        SortField::Stock => a.stock.cmp(&b.stock),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn create(&self, product: Product) -> ProductResult<Product> {
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_page(
        &self,
        filter: ProductFilter,
        sort: Option<ProductSort>,
        pagination: Pagination,
    ) -> ProductResult<(Vec<Product>, u64)> {
        let mut matches: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        if let Some(sort) = sort {
            matches.sort_by(|a, b| {
                let ord = compare(a, b, sort.field);
                match sort.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }

        let total = matches.len() as u64;
        let items = match pagination.limit {
            Some(limit) => matches
                .into_iter()
                .skip(pagination.skip() as usize)
                .take(limit as usize)
                .collect(),
            None => matches,
        };
        Ok((items, total))
    }

    async fn update(&self, id: ObjectId, update: UpdateProduct) -> ProductResult<Option<Product>> {
        let mut products = self.products.lock().unwrap();
        Ok(products.iter_mut().find(|p| p.id == id).map(|p| {
            p.apply_update(update);
            p.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> ProductResult<bool> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

#[async_trait]
impl StockRepository for InMemoryStore {
    async fn apply_adjustments(
        &self,
        adjustments: Vec<StockAdjustment>,
    ) -> ProductResult<StockWriteSummary> {
        self.stock_batches.lock().unwrap().push(adjustments.clone());

        if self
            .fail_writes
            .fetch_update(AtomicOrdering::SeqCst, AtomicOrdering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(ProductError::WriteRejected("store unreachable".into()));
        }

        let mut products = self.products.lock().unwrap();
        let mut summary = StockWriteSummary::default();
        for adjustment in adjustments {
            if let Some(p) = products.iter_mut().find(|p| p.id == adjustment.id) {
                p.stock += adjustment.delta;
                p.updated_at = chrono::Utc::now();
                summary.matched += 1;
                if adjustment.delta != 0 {
                    summary.modified += 1;
                }
            }
        }
        Ok(summary)
    }
}

/// Uploader that answers with a fixed URL and counts calls.
#[derive(Clone, Default)]
pub struct FakeUploader {
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ImageUploader for FakeUploader {
    async fn upload_image(&self, image: ImageUpload) -> ProductResult<String> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(format!("https://cdn.test/{}", image.file_name))
    }
}

/// Helper to parse a JSON response body
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
