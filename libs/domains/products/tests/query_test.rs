//! Listing behaviour of the product service over an in-memory store.

mod common;

use common::{FakeUploader, InMemoryStore};
use domain_products::{ProductQuery, ProductService, SortField, SortOrder};
use std::sync::Arc;

fn service(store: &InMemoryStore) -> ProductService<InMemoryStore> {
    ProductService::new(store.clone(), Arc::new(FakeUploader::default()))
}

#[tokio::test]
async fn test_second_page_of_twenty_five() {
    let store = InMemoryStore::new();
    for i in 1..=25 {
        store.insert(&format!("Item {i:02}"), "misc", i as f64, i);
    }

    let page = service(&store)
        .list_products(ProductQuery {
            sort: Some(SortField::Stock),
            page: Some(2),
            limit: Some(10),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total, 25);
    assert_eq!(page.items.len(), 10);
    let stocks: Vec<i64> = page.items.iter().map(|p| p.stock).collect();
    assert_eq!(stocks, (11..=20).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_name_filter_matches_substring_any_case() {
    let store = InMemoryStore::new();
    store.insert("Toolbox", "tools", 10.0, 1);
    store.insert("BOX-123", "tools", 10.0, 1);
    store.insert("Crate", "tools", 10.0, 1);

    let page = service(&store)
        .list_products(ProductQuery {
            name: Some("box".into()),
            sort: Some(SortField::Name),
            ..Default::default()
        })
        .await
        .unwrap();

    let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["BOX-123", "Toolbox"]);
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn test_category_and_price_range() {
    let store = InMemoryStore::new();
    store.insert("Hammer", "tools", 15.0, 1);
    store.insert("Drill", "tools", 120.0, 1);
    store.insert("Shelf", "storage", 15.0, 1);

    let page = service(&store)
        .list_products(ProductQuery {
            category: Some("tools".into()),
            min_price: Some(10.0),
            max_price: Some(100.0),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "Hammer");
}

#[tokio::test]
async fn test_zero_limit_returns_everything_sorted_desc() {
    let store = InMemoryStore::new();
    for price in [3.0, 1.0, 2.0] {
        store.insert("x", "c", price, 0);
    }

    let page = service(&store)
        .list_products(ProductQuery {
            sort: Some(SortField::Price),
            order: Some(SortOrder::Desc),
            page: Some(5),
            limit: Some(0),
            ..Default::default()
        })
        .await
        .unwrap();

    let prices: Vec<f64> = page.items.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![3.0, 2.0, 1.0]);
    assert_eq!(page.limit, None);
}
