use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OrderEventType {
    /// The order-creation endpoint opened a new order.
    Create,
    /// The payment processor confirmed the payment.
    Pay,
    /// The payment processor reported a failed payment.
    Fail,
    /// Run an expiry sweep now.
    Sweep,
}

/// One row of a batch of ledger events.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OrderEvent {
    pub r#type: OrderEventType,
    pub order: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub wallet: Option<String>,
    /// Seconds until expiry, relative to the time the event is applied.
    pub expires_in: Option<i64>,
    /// Payment-processor reference attached to a `pay` event.
    pub reference: Option<String>,
}
