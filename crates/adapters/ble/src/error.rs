//! BLE adapter error types.

use std::time::Duration;

use btleplug::api::{BDAddr, ParseBDAddrError};

use plughub_domain::error::{CharacteristicNotFoundError, PlugError};

/// Errors specific to the BLE adapter.
#[derive(Debug, thiserror::Error)]
pub enum BleError {
    /// No BLE adapter found on the host.
    #[error("no BLE adapter available")]
    NotAvailable,

    /// A btleplug operation failed.
    #[error("BLE operation failed")]
    Btle(#[from] btleplug::Error),

    /// A radio operation did not complete in time.
    #[error("BLE {operation} timed out after {after:?}")]
    Timeout {
        /// What was being done (e.g. "connect", "read").
        operation: &'static str,
        /// The bound that was exceeded.
        after: Duration,
    },

    /// The address is not a `AA:BB:CC:DD:EE:FF` BLE address.
    #[error("invalid BLE address")]
    InvalidAddress(#[from] ParseBDAddrError),

    /// The adapter has no peripheral with this address (out of range, or
    /// never seen).
    #[error("peripheral {0} is not known to the adapter")]
    UnknownPeripheral(BDAddr),

    /// The connected peripheral does not expose the characteristic.
    #[error("characteristic {uuid} not found")]
    CharacteristicNotFound {
        /// UUID that was looked up.
        uuid: uuid::Uuid,
    },
}

impl BleError {
    /// Whether the error means the link to the device was lost or never
    /// established, which the application layer treats as transient.
    #[must_use]
    pub fn is_link_loss(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::UnknownPeripheral(_) => true,
            Self::Btle(err) => matches!(
                err,
                btleplug::Error::DeviceNotFound
                    | btleplug::Error::NotConnected
                    | btleplug::Error::TimedOut(_)
            ),
            _ => false,
        }
    }

    /// Attach `uuid` to a bare "no such characteristic" error from btleplug.
    pub(crate) fn for_characteristic(self, uuid: uuid::Uuid) -> Self {
        match self {
            Self::Btle(btleplug::Error::NoSuchCharacteristic) => {
                Self::CharacteristicNotFound { uuid }
            }
            other => other,
        }
    }

    /// Classify into the application error taxonomy.
    #[must_use]
    pub fn into_domain(self) -> PlugError {
        match self {
            Self::CharacteristicNotFound { uuid } => CharacteristicNotFoundError { uuid }.into(),
            err if err.is_link_loss() => PlugError::disconnected(err),
            err => PlugError::transport(err),
        }
    }
}

impl From<BleError> for PlugError {
    fn from(err: BleError) -> Self {
        err.into_domain()
    }
}
