//! Application layer containing the ledger orchestration.
//!
//! [`ledger::OrderLedger`] is the keyed order registry with its expiry sweep,
//! [`sweeper::ExpirySweeper`] drives that sweep from a tokio task, and
//! [`service::OrderService`] plays the request handlers that create orders and
//! record payment outcomes.

pub mod ledger;
pub mod service;
pub mod sweeper;
