//! Integration tests for restoring and persisting the cart.
//!
//! Each test starts one or more providers over the same store, the way an
//! application does across restarts.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use marketplace_cart::{
    CartError, CartProvider, FileStore, KeyValueStore, MemoryStore, STORAGE_KEY,
};
use marketplace_cart_core::{Cart, decode_cart};
use marketplace_cart_integration_tests::{mug, quantities, shirt};
use tempfile::TempDir;

/// Poll `store` until it holds `expected`, without stopping the provider.
async fn wait_for_stored(store: &impl KeyValueStore, expected: &Cart) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let stored = store.get(STORAGE_KEY).await.unwrap();
            if stored.is_some_and(|raw| decode_cart(&raw).unwrap() == *expected) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

async fn stored_cart(store: &impl KeyValueStore) -> Cart {
    let raw = store.get(STORAGE_KEY).await.unwrap().unwrap();
    decode_cart(&raw).unwrap()
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let store = MemoryStore::new();

    let first = CartProvider::start(store.clone());
    first.loaded().await;
    let cart = first.handle();
    cart.add_to_cart(shirt());
    cart.add_to_cart(mug());
    cart.increment("a");
    first.shutdown().await.unwrap();

    let second = CartProvider::start(store.clone());
    second.loaded().await;
    assert_eq!(
        quantities(&second.handle().products()),
        vec![("a".to_string(), 2), ("b".to_string(), 1)]
    );
    second.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_mutations_are_written_while_running() {
    let store = MemoryStore::new();
    let provider = CartProvider::start(store.clone());
    provider.loaded().await;
    let cart = provider.handle();

    cart.add_to_cart(shirt());
    wait_for_stored(&store, &cart.products()).await;

    cart.add_to_cart(mug());
    cart.increment("b");
    wait_for_stored(&store, &cart.products()).await;

    cart.decrement("a");
    wait_for_stored(&store, &cart.products()).await;
    assert_eq!(
        quantities(&stored_cart(&store).await),
        vec![("b".to_string(), 2)]
    );

    provider.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_store_holds_latest_snapshot_after_shutdown() {
    let store = MemoryStore::new();
    let provider = CartProvider::start(store.clone());
    provider.loaded().await;
    let cart = provider.handle();

    for _ in 0..50 {
        cart.add_to_cart(shirt());
    }
    cart.decrement("a");
    let expected = cart.products();

    provider.shutdown().await.unwrap();

    assert_eq!(stored_cart(&store).await, *expected);
    assert_eq!(expected.get("a").unwrap().quantity, 49);
}

#[tokio::test]
async fn test_emptied_cart_is_persisted_as_empty_array() {
    let store = MemoryStore::new();
    let provider = CartProvider::start(store.clone());
    provider.loaded().await;
    let cart = provider.handle();

    cart.add_to_cart(shirt());
    cart.decrement("a");
    provider.shutdown().await.unwrap();

    assert_eq!(store.get(STORAGE_KEY).await.unwrap().as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_untouched_cart_writes_nothing() {
    let store = MemoryStore::new();
    let provider = CartProvider::start(store.clone());
    provider.loaded().await;
    provider.shutdown().await.unwrap();

    assert_eq!(store.get(STORAGE_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_malformed_snapshot_leaves_cart_empty() {
    let store = MemoryStore::with_entry(STORAGE_KEY, r#"[{"id":"a"}]"#);
    let provider = CartProvider::start(store.clone());
    provider.loaded().await;

    assert!(provider.handle().products().is_empty());

    let err = provider.shutdown().await.unwrap_err();
    assert!(matches!(err, CartError::Snapshot(_)));
}

#[tokio::test]
async fn test_mutation_after_malformed_snapshot_overwrites_it() {
    let store = MemoryStore::with_entry(STORAGE_KEY, "garbage");
    let provider = CartProvider::start(store.clone());
    provider.loaded().await;

    provider.handle().add_to_cart(shirt());
    assert!(provider.shutdown().await.is_err());

    let restored = stored_cart(&store).await;
    assert_eq!(quantities(&restored), vec![("a".to_string(), 1)]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_mutations_before_load_win() {
    let store = MemoryStore::with_entry(
        STORAGE_KEY,
        r#"[{"id":"b","title":"Mug","imageUrl":"m","price":4.5,"quantity":3}]"#,
    );

    // On a current-thread runtime the worker cannot run before this task
    // yields, so the mutation lands before the stored snapshot is read.
    let provider = CartProvider::start(store.clone());
    let cart = provider.handle();
    cart.add_to_cart(shirt());
    assert!(!cart.is_loaded());

    provider.loaded().await;
    assert_eq!(quantities(&cart.products()), vec![("a".to_string(), 1)]);

    provider.shutdown().await.unwrap();
    assert_eq!(
        quantities(&stored_cart(&store).await),
        vec![("a".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_file_store_round_trip_across_providers() {
    let dir = TempDir::new().unwrap();

    let first = CartProvider::start(FileStore::new(dir.path()));
    first.loaded().await;
    first.handle().add_to_cart(mug());
    first.shutdown().await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("products.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["imageUrl"], "https://img.example/mug.png");
    assert_eq!(value[0]["price"].as_f64(), Some(19.99));

    let second = CartProvider::start(FileStore::new(dir.path()));
    second.loaded().await;
    let products = second.handle().products();
    assert_eq!(products.get("b").unwrap().price, mug().price);
    second.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_legacy_snapshot_is_restored() {
    let store = MemoryStore::with_entry(
        STORAGE_KEY,
        r#"[{"id":"a","title":"Shirt","image_url":"u","price":10,"quantity":4}]"#,
    );
    let provider = CartProvider::start(store);
    provider.loaded().await;

    let products = provider.handle().products();
    let line = products.get("a").unwrap();
    assert_eq!(line.quantity, 4);
    assert_eq!(line.image_url, "u");

    provider.shutdown().await.unwrap();
}
