//! # plughub-adapter-ble
//!
//! BLE transport backed by `btleplug`. Scans for advertisements and
//! reads/writes GATT characteristics on one peripheral at a time.
//!
//! ## How it works
//!
//! A scan listens to adapter events for a fixed duration and reports every
//! peripheral that advertised during that window, with its address type and
//! local name. Control opens a GATT link by address, discovers services and
//! reads or writes a single characteristic. Every radio call is bounded by
//! the timeouts in [`BleConfig`].
//!
//! ## Dependency rule
//!
//! Depends on `plughub-app` (for the [`Transport`] port) and
//! `plughub-domain`. Nothing depends on this crate except the binary.

mod config;
mod error;
mod gatt;
mod scanner;

pub use config::BleConfig;
pub use error::BleError;
pub use gatt::BleConnection;

use std::time::Duration;

use btleplug::api::Manager as _;
use btleplug::platform::{Adapter, Manager};

use plughub_app::ports::{ExclusiveAccess, RadioLock, Transport};
use plughub_domain::error::PlugError;
use plughub_domain::scan::ScanEntry;

/// [`Transport`] over the first BLE adapter of the host.
pub struct BleTransport {
    // Kept alive alongside the adapter it produced.
    _manager: Manager,
    central: Adapter,
    config: BleConfig,
    radio: RadioLock,
}

impl BleTransport {
    /// Open the host's first BLE adapter.
    ///
    /// # Errors
    ///
    /// Returns [`BleError::NotAvailable`] if the host has no BLE adapter, or
    /// the btleplug error if the platform manager cannot be created.
    pub async fn new(config: BleConfig) -> Result<Self, BleError> {
        let manager = Manager::new().await?;
        let central = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or(BleError::NotAvailable)?;

        tracing::info!(
            connect_timeout_secs = config.connect_timeout_secs,
            io_timeout_secs = config.io_timeout_secs,
            "BLE adapter ready"
        );

        Ok(Self {
            _manager: manager,
            central,
            config,
            radio: RadioLock::new(),
        })
    }
}

impl Transport for BleTransport {
    type Connection = BleConnection;

    async fn scan(&self, duration: Duration) -> Result<Vec<ScanEntry>, PlugError> {
        let entries = scanner::run_scan(&self.central, duration, self.config.io_timeout()).await?;
        Ok(entries)
    }

    async fn connect(&self, address: &str) -> Result<BleConnection, PlugError> {
        let connection = gatt::open(
            &self.central,
            address,
            self.config.connect_timeout(),
            self.config.io_timeout(),
        )
        .await?;
        tracing::debug!(%address, "BLE link open");
        Ok(connection)
    }

    async fn exclusive(&self) -> ExclusiveAccess {
        self.radio.acquire().await
    }
}
