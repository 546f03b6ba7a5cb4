use super::ledger::{OrderLedger, SweepReport};
use super::sweeper::ExpirySweeper;
use crate::config::LedgerConfig;
use crate::domain::clock::Clock;
use crate::domain::event::{OrderEvent, OrderEventType};
use crate::domain::order::{Amount, Order, OrderStatus};
use crate::domain::ports::OrderStoreBox;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Parameters for opening a new order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    /// Explicit id; a UUID is generated when absent.
    pub id: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub wallet_address: Option<String>,
    /// Overrides the configured TTL. May be negative.
    pub expires_in: Option<chrono::Duration>,
}

/// The request-handler side of the ledger.
///
/// `OrderService` owns the shared [`OrderLedger`] and its [`ExpirySweeper`].
/// [`OrderService::init`] starts the sweep, [`OrderService::shutdown`] stops
/// it and hands back the final state of every order.
pub struct OrderService {
    ledger: Arc<OrderLedger>,
    sweeper: ExpirySweeper,
    order_ttl: chrono::Duration,
}

impl OrderService {
    /// Validates `config`, builds the ledger and starts the expiry sweeper.
    ///
    /// Must be called from within a tokio runtime.
    pub fn init(store: OrderStoreBox, clock: Arc<dyn Clock>, config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        let order_ttl = chrono::Duration::from_std(config.order_ttl)
            .map_err(|e| LedgerError::ValidationError(format!("Order TTL out of range: {}", e)))?;

        let ledger = Arc::new(OrderLedger::new(store, clock));
        let sweeper = ExpirySweeper::start(ledger.clone(), config.sweep_interval)?;

        Ok(Self {
            ledger,
            sweeper,
            order_ttl,
        })
    }

    pub fn ledger(&self) -> &Arc<OrderLedger> {
        &self.ledger
    }

    /// Opens a pending order expiring one TTL from now.
    pub async fn create_order(&self, new_order: NewOrder) -> Result<Order> {
        let amount = Amount::new(new_order.amount)?;
        let id = match new_order.id {
            Some(id) if id.is_empty() => {
                return Err(LedgerError::ValidationError(
                    "Order id must not be empty".to_string(),
                ));
            }
            Some(id) => id,
            None => Uuid::new_v4().to_string(),
        };

        if self.ledger.get(&id).await.is_ok() {
            return Err(LedgerError::ValidationError(format!(
                "Order {} already exists",
                id
            )));
        }

        let now = self.ledger.now();
        let ttl = new_order.expires_in.unwrap_or(self.order_ttl);
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            LedgerError::ValidationError(format!("Expiry {} from now is out of range", ttl))
        })?;
        let mut order = Order::new(id, amount, new_order.currency, now, expires_at);
        order.wallet_address = new_order.wallet_address;

        self.ledger.put(order.clone()).await?;
        info!(order_id = %order.id, expires_at = %order.expires_at, "Order created");
        Ok(order)
    }

    /// Current state of an order, as last written.
    pub async fn order_status(&self, id: &str) -> Result<Order> {
        self.ledger.get(id).await
    }

    /// Marks a pending order as paid.
    ///
    /// Fails with [`LedgerError::InvalidTransition`] if the order is no longer
    /// pending, including when a sweep expired it after it was read.
    pub async fn confirm_payment(&self, id: &str, payment_reference: Option<String>) -> Result<Order> {
        let mut order = self.ledger.get(id).await?;
        order.mark_paid(payment_reference)?;
        self.write_transition(order).await
    }

    /// Marks a pending order as failed.
    pub async fn fail_payment(&self, id: &str) -> Result<Order> {
        let mut order = self.ledger.get(id).await?;
        order.mark_failed()?;
        self.write_transition(order).await
    }

    /// Runs an expiry sweep on the sweeper task right away.
    pub async fn sweep_now(&self) -> Result<SweepReport> {
        self.sweeper.tick().await
    }

    /// Applies one batch event.
    pub async fn apply(&self, event: OrderEvent) -> Result<()> {
        match event.r#type {
            OrderEventType::Create => {
                let amount = event.amount.ok_or_else(|| {
                    LedgerError::ValidationError("Missing amount for create".to_string())
                })?;
                let currency = event.currency.ok_or_else(|| {
                    LedgerError::ValidationError("Missing currency for create".to_string())
                })?;
                self.create_order(NewOrder {
                    id: event.order,
                    amount,
                    currency,
                    wallet_address: event.wallet,
                    expires_in: event.expires_in.map(expiry_offset).transpose()?,
                })
                .await?;
            }
            OrderEventType::Pay => {
                let id = required_id(event.order)?;
                self.confirm_payment(&id, event.reference).await?;
            }
            OrderEventType::Fail => {
                let id = required_id(event.order)?;
                self.fail_payment(&id).await?;
            }
            OrderEventType::Sweep => {
                let report = self.sweep_now().await?;
                debug!(?report, "Manual sweep");
            }
        }
        Ok(())
    }

    /// Stops the sweeper and returns every order, sorted by id.
    pub async fn shutdown(self) -> Result<Vec<Order>> {
        self.sweeper.shutdown().await?;
        let mut orders: Vec<Order> = self
            .ledger
            .all()
            .await?
            .into_iter()
            .map(|(_, order)| order)
            .collect();
        orders.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(orders)
    }

    async fn write_transition(&self, order: Order) -> Result<Order> {
        if self
            .ledger
            .put_if_status(order.clone(), OrderStatus::Pending)
            .await?
        {
            info!(order_id = %order.id, status = %order.status, "Order updated");
            return Ok(order);
        }

        // Someone else moved the order first; report what it is now.
        let current = self.ledger.get(&order.id).await?;
        Err(LedgerError::InvalidTransition {
            id: order.id,
            from: current.status,
            to: order.status,
        })
    }
}

fn expiry_offset(seconds: i64) -> Result<chrono::Duration> {
    chrono::Duration::try_seconds(seconds).ok_or_else(|| {
        LedgerError::ValidationError(format!("Expiry offset {}s is out of range", seconds))
    })
}

fn required_id(order: Option<String>) -> Result<String> {
    order.ok_or_else(|| LedgerError::ValidationError("Missing order id".to_string()))
}
