use chrono::{Duration, Utc};
use order_ledger::domain::order::OrderStatus;
use order_ledger::domain::ports::OrderStoreBox;
use order_ledger::infrastructure::in_memory::InMemoryOrderStore;

mod common;

#[tokio::test]
async fn test_store_as_trait_object() {
    let store = InMemoryOrderStore::new();
    let writer: OrderStoreBox = Box::new(store.clone());
    let reader: OrderStoreBox = Box::new(store);

    let order = common::pending_order("A1", Utc::now() + Duration::minutes(10));

    // Verify Send + Sync by spawning tasks
    let write_handle = tokio::spawn(async move {
        writer.put(order).await.unwrap();
    });
    write_handle.await.unwrap();

    let read_handle = tokio::spawn(async move { reader.get("A1").await.unwrap().unwrap() });

    let retrieved = read_handle.await.unwrap();
    assert_eq!(retrieved.id, "A1");
    assert_eq!(retrieved.status, OrderStatus::Pending);
}
