//! BLE transport configuration.

use std::time::Duration;

use serde::Deserialize;

/// Timeouts bounding every radio operation of the BLE transport.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BleConfig {
    /// Upper bound for connecting and discovering services, in seconds.
    pub connect_timeout_secs: u16,
    /// Upper bound for a single read, write, disconnect or scan control call,
    /// in seconds.
    pub io_timeout_secs: u16,
}

impl Default for BleConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            io_timeout_secs: 5,
        }
    }
}

impl BleConfig {
    /// Bound for connecting and discovering services.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_secs))
    }

    /// Bound for each read, write, disconnect or scan control call.
    #[must_use]
    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.io_timeout_secs))
    }
}
