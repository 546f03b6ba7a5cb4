use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A positive purchase amount.
///
/// The ledger never does arithmetic on it; the wrapper only guarantees that
/// orders are never created for zero or negative sums.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, LedgerError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LedgerError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Expired,
    Failed,
}

impl OrderStatus {
    /// Paid, expired and failed orders never transition again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Expired => "expired",
            OrderStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One purchase attempt, tracked through its payment states.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Order {
    /// Opaque unique identifier, the ledger key.
    pub id: String,
    pub status: OrderStatus,
    pub amount: Amount,
    pub currency: String,
    /// Wallet the buyer pays from, if known.
    pub wallet_address: Option<String>,
    /// Payment-processor reference recorded when the payment is confirmed.
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    /// After this instant a pending order is no longer valid.
    pub expires_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        amount: Amount,
        currency: impl Into<String>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            status: OrderStatus::Pending,
            amount,
            currency: currency.into(),
            wallet_address: None,
            payment_reference: None,
            created_at,
            expires_at,
        }
    }

    pub fn with_wallet(mut self, wallet_address: impl Into<String>) -> Self {
        self.wallet_address = Some(wallet_address.into());
        self
    }

    /// Whether a pending order has outlived its expiry at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == OrderStatus::Pending && now > self.expires_at
    }

    /// Moves a due pending order to `Expired`. Returns whether it changed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_due(now) {
            self.status = OrderStatus::Expired;
            true
        } else {
            false
        }
    }

    /// Records a confirmed payment
    pub fn mark_paid(&mut self, payment_reference: Option<String>) -> Result<(), LedgerError> {
        self.transition(OrderStatus::Paid)?;
        self.payment_reference = payment_reference;
        Ok(())
    }

    /// Records a failed payment
    pub fn mark_failed(&mut self) -> Result<(), LedgerError> {
        self.transition(OrderStatus::Failed)
    }

    fn transition(&mut self, to: OrderStatus) -> Result<(), LedgerError> {
        if self.status.is_terminal() {
            return Err(LedgerError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn order_expiring_at(expires_at: DateTime<Utc>) -> Order {
        let amount = Amount::new(dec!(25.00)).unwrap();
        Order::new("A1", amount, "USDC", expires_at - Duration::minutes(30), expires_at)
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(0.01)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(LedgerError::ValidationError(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-5.0)),
            Err(LedgerError::ValidationError(_))
        ));
    }

    #[test]
    fn test_new_order_is_pending() {
        let order = order_expiring_at(Utc::now());
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.payment_reference.is_none());
    }

    #[test]
    fn test_expire_is_strict() {
        let expires_at = Utc::now();
        let mut order = order_expiring_at(expires_at);

        // Exactly at the expiry instant the order is still valid.
        assert!(!order.expire(expires_at));
        assert_eq!(order.status, OrderStatus::Pending);

        assert!(order.expire(expires_at + Duration::milliseconds(1)));
        assert_eq!(order.status, OrderStatus::Expired);
    }

    #[test]
    fn test_expire_ignores_terminal_orders() {
        let expires_at = Utc::now();
        let mut order = order_expiring_at(expires_at);
        order.mark_paid(Some("pi_123".to_string())).unwrap();

        assert!(!order.expire(expires_at + Duration::hours(1)));
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.payment_reference.as_deref(), Some("pi_123"));
    }

    #[test]
    fn test_no_transition_out_of_terminal_states() {
        let expires_at = Utc::now();
        let mut order = order_expiring_at(expires_at);
        assert!(order.expire(expires_at + Duration::seconds(1)));

        let err = order.mark_paid(None).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidTransition {
                from: OrderStatus::Expired,
                to: OrderStatus::Paid,
                ..
            }
        ));

        let mut failed = order_expiring_at(expires_at);
        failed.mark_failed().unwrap();
        assert!(failed.mark_paid(None).is_err());
        assert_eq!(failed.status, OrderStatus::Failed);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&OrderStatus::Expired).unwrap();
        assert_eq!(json, "\"expired\"");
        assert_eq!(OrderStatus::Paid.to_string(), "paid");
    }
}
