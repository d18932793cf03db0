//! Transport port: BLE scanning and GATT primitives behind a narrow interface.
//!
//! Implementations live in adapter crates (e.g. `plughub-adapter-ble`). Every
//! operation touches live radio hardware and must be bounded by a timeout
//! inside the implementation; the application layer never waits on the radio
//! without one.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};

use plughub_domain::error::PlugError;
use plughub_domain::scan::ScanEntry;

/// Access to a BLE radio.
pub trait Transport: Send + Sync {
    /// Open link to one device, produced by [`connect`](Self::connect).
    type Connection: Connection;

    /// Scan for advertisements during `duration` and return every entry seen.
    ///
    /// The result may be empty. Radio/adapter failures surface as
    /// [`PlugError::Transport`].
    fn scan(
        &self,
        duration: Duration,
    ) -> impl Future<Output = Result<Vec<ScanEntry>, PlugError>> + Send;

    /// Open a GATT connection to the device at `address`.
    ///
    /// Unreachable devices and handshake drops surface as
    /// [`PlugError::Disconnected`].
    fn connect(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Self::Connection, PlugError>> + Send;

    /// Wait for exclusive use of the radio.
    ///
    /// The radio serves one scan-or-connect-to-write sequence at a time; the
    /// returned guard releases it on drop.
    fn exclusive(&self) -> impl Future<Output = ExclusiveAccess> + Send;
}

/// An open link to one physical device, valid for a single control operation.
pub trait Connection: Send {
    /// Read the raw value of the characteristic `uuid`.
    fn read_characteristic(
        &mut self,
        uuid: uuid::Uuid,
    ) -> impl Future<Output = Result<Vec<u8>, PlugError>> + Send;

    /// Write `value` to the characteristic `uuid`.
    fn write_characteristic(
        &mut self,
        uuid: uuid::Uuid,
        value: &[u8],
    ) -> impl Future<Output = Result<(), PlugError>> + Send;

    /// Close the link. The handle cannot be used afterwards.
    fn disconnect(self) -> impl Future<Output = Result<(), PlugError>> + Send;
}

/// Mutual-exclusion lock guarding a radio.
///
/// Cloning shares the same lock.
#[derive(Debug, Clone, Default)]
pub struct RadioLock {
    inner: Arc<Mutex<()>>,
}

impl RadioLock {
    /// Create a new, unlocked radio lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until the radio is free and take it.
    pub async fn acquire(&self) -> ExclusiveAccess {
        ExclusiveAccess {
            _guard: Arc::clone(&self.inner).lock_owned().await,
        }
    }

    /// Whether some caller currently holds the radio.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.inner.try_lock().is_err()
    }
}

/// Proof of exclusive radio access; released on drop.
#[must_use = "the radio is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ExclusiveAccess {
    _guard: OwnedMutexGuard<()>,
}
