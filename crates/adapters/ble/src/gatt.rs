//! GATT connection helpers for active plug control.
//!
//! Provides [`open`] which finds a scanned peripheral by address, connects and
//! discovers its services, and [`BleConnection`] which reads and writes
//! characteristics on it. Every radio call is bounded by a timeout.

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use btleplug::api::{BDAddr, Central, Characteristic, Peripheral as _, WriteType};
use btleplug::platform::{Adapter, Peripheral};

use plughub_app::ports::Connection;
use plughub_domain::error::PlugError;

use crate::error::BleError;

/// Await a btleplug call, failing with [`BleError::Timeout`] after `limit`.
pub(crate) async fn bounded<T>(
    operation: &'static str,
    limit: Duration,
    call: impl Future<Output = Result<T, btleplug::Error>>,
) -> Result<T, BleError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(BleError::from),
        Err(_) => Err(BleError::Timeout {
            operation,
            after: limit,
        }),
    }
}

/// Await `step`; if it fails, run `release` (bounded by `limit`) before
/// returning the step's error.
///
/// The link is dropped whichever step failed, timeouts included.
async fn or_release<T>(
    address: BDAddr,
    limit: Duration,
    step: impl Future<Output = Result<T, BleError>>,
    release: impl Future<Output = Result<(), btleplug::Error>>,
) -> Result<T, BleError> {
    match step.await {
        Ok(value) => Ok(value),
        Err(err) => {
            if let Err(release_err) = bounded("disconnect", limit, release).await {
                tracing::warn!(
                    error = %release_err,
                    %address,
                    "failed to drop half-open BLE link"
                );
            }
            Err(err)
        }
    }
}

/// Find a GATT characteristic by UUID on a peripheral that has already
/// discovered its services.
///
/// # Errors
///
/// Returns [`BleError::CharacteristicNotFound`] if no characteristic with
/// the given UUID is present.
fn find_characteristic(
    peripheral: &Peripheral,
    uuid: uuid::Uuid,
) -> Result<Characteristic, BleError> {
    peripheral
        .characteristics()
        .into_iter()
        .find(|c| c.uuid == uuid)
        .ok_or(BleError::CharacteristicNotFound { uuid })
}

/// Find the peripheral with `address` among those the adapter knows about.
async fn find_peripheral(
    central: &Adapter,
    address: BDAddr,
    limit: Duration,
) -> Result<Peripheral, BleError> {
    bounded("list peripherals", limit, central.peripherals())
        .await?
        .into_iter()
        .find(|p| p.address() == address)
        .ok_or(BleError::UnknownPeripheral(address))
}

/// Connect to the peripheral at `address` and discover its services.
///
/// If connecting or service discovery fails the link is dropped before
/// returning, so a failed call never leaves the peripheral connected.
///
/// # Errors
///
/// Returns [`BleError::UnknownPeripheral`] when the adapter has not seen the
/// address, [`BleError::Timeout`] when a step exceeds `connect_timeout`, or
/// the underlying btleplug error.
pub(crate) async fn open(
    central: &Adapter,
    address: &str,
    connect_timeout: Duration,
    io_timeout: Duration,
) -> Result<BleConnection, BleError> {
    let address = BDAddr::from_str(address)?;
    let peripheral = find_peripheral(central, address, io_timeout).await?;

    let establish = async {
        bounded("connect", connect_timeout, peripheral.connect()).await?;
        bounded(
            "discover services",
            connect_timeout,
            peripheral.discover_services(),
        )
        .await
    };
    or_release(address, io_timeout, establish, peripheral.disconnect()).await?;

    Ok(BleConnection {
        peripheral,
        address,
        io_timeout,
    })
}

/// An open GATT link to one plug.
pub struct BleConnection {
    peripheral: Peripheral,
    address: BDAddr,
    io_timeout: Duration,
}

impl BleConnection {
    async fn read(&self, uuid: uuid::Uuid) -> Result<Vec<u8>, BleError> {
        let characteristic = find_characteristic(&self.peripheral, uuid)?;
        bounded("read", self.io_timeout, self.peripheral.read(&characteristic))
            .await
            .map_err(|err| err.for_characteristic(uuid))
    }

    async fn write(&self, uuid: uuid::Uuid, value: &[u8]) -> Result<(), BleError> {
        let characteristic = find_characteristic(&self.peripheral, uuid)?;
        bounded(
            "write",
            self.io_timeout,
            self.peripheral
                .write(&characteristic, value, WriteType::WithResponse),
        )
        .await
        .map_err(|err| err.for_characteristic(uuid))
    }
}

impl Connection for BleConnection {
    async fn read_characteristic(&mut self, uuid: uuid::Uuid) -> Result<Vec<u8>, PlugError> {
        let value = self.read(uuid).await?;
        tracing::debug!(address = %self.address, %uuid, len = value.len(), "GATT read");
        Ok(value)
    }

    async fn write_characteristic(
        &mut self,
        uuid: uuid::Uuid,
        value: &[u8],
    ) -> Result<(), PlugError> {
        self.write(uuid, value).await?;
        tracing::debug!(address = %self.address, %uuid, len = value.len(), "GATT write");
        Ok(())
    }

    async fn disconnect(self) -> Result<(), PlugError> {
        bounded("disconnect", self.io_timeout, self.peripheral.disconnect()).await?;
        tracing::debug!(address = %self.address, "BLE link closed");
        Ok(())
    }
}
