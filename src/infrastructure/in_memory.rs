use crate::domain::order::{Order, OrderStatus};
use crate::domain::ports::OrderStore;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for orders.
///
/// Uses `Arc<RwLock<HashMap<String, Order>>>` to allow shared concurrent access.
/// Contents live only as long as the process.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn put(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id.clone(), order);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(id).cloned())
    }

    async fn all(&self) -> Result<Vec<(String, Order)>> {
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .map(|(id, order)| (id.clone(), order.clone()))
            .collect())
    }

    async fn put_if_status(&self, order: Order, expected: OrderStatus) -> Result<bool> {
        let mut orders = self.orders.write().await;
        match orders.get(&order.id) {
            Some(current) if current.status == expected => {
                orders.insert(order.id.clone(), order);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
