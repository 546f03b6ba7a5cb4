use chrono::{Duration, Utc};
use order_ledger::application::ledger::OrderLedger;
use order_ledger::domain::ports::{OrderStoreBox, OrderStoreFactory};
use order_ledger::infrastructure::in_memory::InMemoryOrderStore;

mod common;

#[tokio::test]
async fn test_factory_instantiation() {
    let factory: OrderStoreFactory =
        Box::new(|| Box::new(InMemoryOrderStore::new()) as OrderStoreBox);

    let store = factory();
    let order = common::pending_order("A1", Utc::now() + Duration::minutes(10));

    store.put(order).await.unwrap();
    let retrieved = store.get("A1").await.unwrap().unwrap();
    assert_eq!(retrieved.id, "A1");
}

#[tokio::test]
async fn test_factory_builds_isolated_ledgers() {
    let factory: OrderStoreFactory =
        Box::new(|| Box::new(InMemoryOrderStore::new()) as OrderStoreBox);

    let first = OrderLedger::with_system_clock(factory());
    let second = OrderLedger::with_system_clock(factory());

    first
        .put(common::pending_order("A1", Utc::now() + Duration::minutes(10)))
        .await
        .unwrap();

    assert!(first.get("A1").await.is_ok());
    assert!(second.get("A1").await.is_err());
}
