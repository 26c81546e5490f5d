//! Bulk stock adjustment against an in-memory store.

mod common;

use common::InMemoryStore;
use domain_products::{ProductError, StockService, StockUpdateItem};

fn item(id: &str, quantity: u32, increment: bool) -> StockUpdateItem {
    StockUpdateItem {
        product_id: id.to_string(),
        quantity,
        increment,
    }
}

#[tokio::test]
async fn test_increment_and_decrement_by_exact_quantity() {
    let store = InMemoryStore::new();
    let a = store.insert("Toolbox", "tools", 10.0, 10);
    let b = store.insert("Crate", "storage", 5.0, 3);

    let service = StockService::new(store.clone());
    service
        .bulk_adjust(&[item(&a.to_hex(), 5, true), item(&b.to_hex(), 3, false)])
        .await
        .unwrap();

    assert_eq!(store.stock_of(a), Some(15));
    assert_eq!(store.stock_of(b), Some(0));
    assert_eq!(store.stock_batches().len(), 1);
}

#[tokio::test]
async fn test_empty_request_issues_no_write() {
    let store = InMemoryStore::new();
    let service = StockService::new(store.clone());

    service.bulk_adjust(&[]).await.unwrap();

    assert!(store.stock_batches().is_empty());
}

#[tokio::test]
async fn test_malformed_id_rejects_whole_batch() {
    let store = InMemoryStore::new();
    let a = store.insert("Toolbox", "tools", 10.0, 10);

    let service = StockService::new(store.clone());
    let result = service
        .bulk_adjust(&[item(&a.to_hex(), 5, true), item("12345", 1, true)])
        .await;

    assert!(matches!(result, Err(ProductError::InvalidIdentifier(_))));
    assert!(store.stock_batches().is_empty());
    assert_eq!(store.stock_of(a), Some(10));
}

#[tokio::test]
async fn test_duplicate_ids_apply_later_entry_once() {
    let store = InMemoryStore::new();
    let a = store.insert("Toolbox", "tools", 10.0, 10);

    let service = StockService::new(store.clone());
    service
        .bulk_adjust(&[item(&a.to_hex(), 4, true), item(&a.to_hex(), 2, false)])
        .await
        .unwrap();

    let batches = store.stock_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 1);
    assert_eq!(batches[0][0].delta, -2);
    assert_eq!(store.stock_of(a), Some(8));
}

#[tokio::test]
async fn test_decrement_below_zero_is_not_floored() {
    let store = InMemoryStore::new();
    let a = store.insert("Toolbox", "tools", 10.0, 1);

    let service = StockService::new(store.clone());
    service.bulk_adjust(&[item(&a.to_hex(), 3, false)]).await.unwrap();

    assert_eq!(store.stock_of(a), Some(-2));
}

#[tokio::test]
async fn test_store_failure_surfaces_and_is_not_retried() {
    let store = InMemoryStore::new();
    let a = store.insert("Toolbox", "tools", 10.0, 10);
    store.fail_next_write();

    let service = StockService::new(store.clone());
    let result = service.bulk_adjust(&[item(&a.to_hex(), 1, true)]).await;

    assert!(matches!(result, Err(ProductError::WriteRejected(_))));
    assert_eq!(store.stock_batches().len(), 1);
    assert_eq!(store.stock_of(a), Some(10));
}

#[tokio::test]
async fn test_unknown_product_is_skipped_by_store() {
    let store = InMemoryStore::new();
    let a = store.insert("Toolbox", "tools", 10.0, 10);

    let service = StockService::new(store.clone());
    let summary = service
        .bulk_adjust(&[
            item(&a.to_hex(), 1, true),
            item("aaaaaaaaaaaaaaaaaaaaaaaa", 1, true),
        ])
        .await
        .unwrap();

    assert_eq!(summary.matched, 1);
    assert_eq!(store.stock_of(a), Some(11));
}
