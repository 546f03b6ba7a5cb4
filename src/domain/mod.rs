//! Domain layer: the order entity, its status state machine, the batch
//! events that drive it and the ports the application layer depends on.

pub mod clock;
pub mod event;
pub mod order;
pub mod ports;
