//! Product listing: filters, sorting and pagination.

use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::models::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortField {
    Name,
    Price,
    Stock,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Query string accepted by `GET /products`.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[validate(schema(function = "validate_price_range"))]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Case-insensitive substring of the product name
    pub name: Option<String>,
    /// Exact category identifier
    pub category: Option<String>,
    #[validate(range(min = 0.0))]
    pub min_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_price: Option<f64>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    /// 1-based page; values below 1 are treated as 1
    pub page: Option<i64>,
    /// Page size; zero, negative or absent returns every match
    pub limit: Option<i64>,
}

fn validate_price_range(query: &ProductQuery) -> Result<(), ValidationError> {
    match (query.min_price, query.max_price) {
        (Some(min), Some(max)) if min > max => {
            let mut err = ValidationError::new("price_range");
            err.message = Some("min_price must not exceed max_price".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

impl ProductQuery {
    /// Split into the parts the repository consumes.
    pub fn into_parts(self) -> (ProductFilter, Option<ProductSort>, Pagination) {
        let filter = ProductFilter {
            name: self.name.filter(|n| !n.is_empty()),
            category: self.category.filter(|c| !c.is_empty()),
            min_price: self.min_price,
            max_price: self.max_price,
        };
        let sort = self.sort.map(|field| ProductSort {
            field,
            order: self.order.unwrap_or_default(),
        });
        (filter, sort, Pagination::new(self.page, self.limit))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductFilter {
    /// Mongo filter document. The name is regex-escaped so user input
    /// is always matched literally.
    pub fn to_document(&self) -> Document {
        let mut filter = doc! {};

        if let Some(name) = &self.name {
            filter.insert(
                "name",
                doc! { "$regex": regex::escape(name), "$options": "i" },
            );
        }

        if let Some(category) = &self.category {
            filter.insert("category", category.as_str());
        }

        if self.min_price.is_some() || self.max_price.is_some() {
            let mut price = doc! {};
            if let Some(min) = self.min_price {
                price.insert("$gte", min);
            }
            if let Some(max) = self.max_price {
                price.insert("$lte", max);
            }
            filter.insert("price", price);
        }

        filter
    }

    /// Same predicate as [`to_document`](Self::to_document), evaluated in memory.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(name) = &self.name {
            if !product.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl ProductSort {
    pub fn to_document(&self) -> Document {
        let direction = match self.order {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        };
        let mut sort = Document::new();
        sort.insert(self.field.to_string(), direction);
        sort
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    /// `None` means unpaged
    pub limit: Option<u64>,
}

impl Pagination {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1) as u64;
        let limit = limit.filter(|l| *l > 0).map(|l| l as u64);
        Self { page, limit }
    }

    pub fn unpaged() -> Self {
        Self { page: 1, limit: None }
    }

    /// Documents to skip; capped at `i64::MAX`, the largest skip the
    /// server accepts.
    pub fn skip(&self) -> u64 {
        match self.limit {
            Some(limit) => (self.page - 1).saturating_mul(limit).min(i64::MAX as u64),
            None => 0,
        }
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: Option<u64>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}
