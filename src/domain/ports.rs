use super::order::{Order, OrderStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Keyed storage for orders. Keys are unique; `put` is last-write-wins.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn put(&self, order: Order) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Order>>;
    async fn all(&self) -> Result<Vec<(String, Order)>>;
    /// Writes `order` only if an order with the same id is stored with
    /// status `expected`. Returns whether the write happened.
    async fn put_if_status(&self, order: Order, expected: OrderStatus) -> Result<bool>;
}

pub type OrderStoreBox = Box<dyn OrderStore>;
pub type OrderStoreFactory = Box<dyn Fn() -> OrderStoreBox + Send + Sync>;
