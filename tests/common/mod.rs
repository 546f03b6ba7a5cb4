#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use order_ledger::application::ledger::OrderLedger;
use order_ledger::domain::clock::ManualClock;
use order_ledger::domain::order::{Amount, Order};
use order_ledger::infrastructure::in_memory::InMemoryOrderStore;
use rust_decimal_macros::dec;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

pub const EVENTS_HEADER: &str = "type, order, amount, currency, wallet, expires_in, reference";

pub fn pending_order(id: &str, expires_at: DateTime<Utc>) -> Order {
    Order::new(
        id,
        Amount::new(dec!(100.0)).unwrap(),
        "USDC",
        expires_at - Duration::minutes(30),
        expires_at,
    )
}

/// A ledger over an empty in-memory store whose clock is frozen at `now`.
pub fn ledger_at(now: DateTime<Utc>) -> (Arc<OrderLedger>, ManualClock) {
    let clock = ManualClock::new(now);
    let ledger = OrderLedger::new(Box::new(InMemoryOrderStore::new()), Arc::new(clock.clone()));
    (Arc::new(ledger), clock)
}

/// Writes an events CSV with the standard header followed by `rows`.
pub fn events_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", EVENTS_HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}
