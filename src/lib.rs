//! In-memory order ledger for a stablecoin checkout flow.
//!
//! Orders are kept in a keyed store for the life of the process. A background
//! sweep moves pending orders past their expiry to `expired`; payment outcomes
//! are recorded by the request handlers in [`application::service`].

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod telemetry;
