use crate::domain::clock::{Clock, SystemClock};
use crate::domain::order::{Order, OrderStatus};
use crate::domain::ports::OrderStoreBox;
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a single expiry sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Orders looked at.
    pub examined: usize,
    /// Pending orders moved to `Expired`.
    pub expired: usize,
    /// Due orders that changed status before the write landed.
    pub skipped: usize,
    /// Due orders whose write failed.
    pub failed: usize,
}

/// The in-memory registry of purchase orders.
///
/// Reads and writes go straight to the store. Expiry is evaluated only by
/// [`OrderLedger::sweep`], so `get` may return a pending order whose
/// `expires_at` has already passed until the next sweep runs.
pub struct OrderLedger {
    store: OrderStoreBox,
    clock: Arc<dyn Clock>,
}

impl OrderLedger {
    /// Creates a ledger over `store`, reading time from `clock`.
    pub fn new(store: OrderStoreBox, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Creates a ledger that uses wall-clock time.
    pub fn with_system_clock(store: OrderStoreBox) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Inserts or overwrites the order under its id.
    pub async fn put(&self, order: Order) -> Result<()> {
        self.store.put(order).await
    }

    /// Writes `order` only if the stored copy still has status `expected`.
    pub async fn put_if_status(&self, order: Order, expected: OrderStatus) -> Result<bool> {
        self.store.put_if_status(order, expected).await
    }

    pub async fn get(&self, id: &str) -> Result<Order> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    pub async fn all(&self) -> Result<Vec<(String, Order)>> {
        self.store.all().await
    }

    /// Expires every pending order whose `expires_at` is strictly before now.
    ///
    /// Each write is guarded on the order still being pending, so a payment
    /// recorded between the read and the write wins. A failure on one order is
    /// logged and the sweep moves on to the next.
    pub async fn sweep(&self) -> SweepReport {
        let now = self.clock.now();
        let mut report = SweepReport::default();

        let orders = match self.store.all().await {
            Ok(orders) => orders,
            Err(e) => {
                warn!(error = %e, "Sweep could not list orders");
                return report;
            }
        };

        for (id, mut order) in orders {
            report.examined += 1;
            if !order.expire(now) {
                continue;
            }

            match self.store.put_if_status(order, OrderStatus::Pending).await {
                Ok(true) => {
                    debug!(order_id = %id, "Order expired");
                    report.expired += 1;
                }
                Ok(false) => {
                    debug!(order_id = %id, "Order changed during sweep, skipped");
                    report.skipped += 1;
                }
                Err(e) => {
                    warn!(order_id = %id, error = %e, "Failed to expire order");
                    report.failed += 1;
                }
            }
        }

        report
    }
}
