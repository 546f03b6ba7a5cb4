use crate::error::{LedgerError, Result};
use std::time::Duration;

/// Default period between expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
/// Default lifetime of a freshly created pending order.
pub const DEFAULT_ORDER_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    pub sweep_interval: Duration,
    pub order_ttl: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            order_ttl: DEFAULT_ORDER_TTL,
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval.is_zero() {
            return Err(LedgerError::ValidationError(
                "Sweep interval must be greater than zero".to_string(),
            ));
        }
        if self.order_ttl.is_zero() {
            return Err(LedgerError::ValidationError(
                "Order TTL must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
