//! BLE scanner: collects the advertisements seen during one bounded scan.

use std::collections::HashSet;
use std::time::Duration;

use btleplug::api::{
    AddressType as BtAddressType, Central, CentralEvent, Peripheral as _, PeripheralProperties,
    ScanFilter,
};
use btleplug::platform::{Adapter, PeripheralId};
use tokio_stream::StreamExt as _;

use plughub_domain::scan::{AddressType, ScanEntry};

use crate::error::BleError;
use crate::gatt::bounded;

/// Map a peripheral's advertised properties into a [`ScanEntry`].
///
/// Platforms that do not report an address type are treated as public, so
/// such devices never pass the smart plug filter.
pub(crate) fn entry_from_properties(props: &PeripheralProperties) -> ScanEntry {
    let address_type = match props.address_type {
        Some(BtAddressType::Random) => AddressType::Random,
        Some(BtAddressType::Public) | None => AddressType::Public,
    };
    ScanEntry::new(
        props.address.to_string(),
        address_type,
        props.local_name.clone(),
    )
}

/// Extract the peripheral id from events that prove the device advertised.
fn advertised_id(event: CentralEvent) -> Option<PeripheralId> {
    match event {
        CentralEvent::DeviceDiscovered(id)
        | CentralEvent::DeviceUpdated(id)
        | CentralEvent::ManufacturerDataAdvertisement { id, .. }
        | CentralEvent::ServiceDataAdvertisement { id, .. }
        | CentralEvent::ServicesAdvertisement { id, .. } => Some(id),
        _ => None,
    }
}

/// Scan for `duration` and return one entry per peripheral that advertised.
///
/// Subscribing, start and stop are bounded by `io_timeout`; the event
/// collection itself ends at the scan deadline.
///
/// # Errors
///
/// Returns [`BleError`] when the scan cannot be started or stopped, or the
/// adapter cannot list its peripherals.
pub(crate) async fn run_scan(
    central: &Adapter,
    duration: Duration,
    io_timeout: Duration,
) -> Result<Vec<ScanEntry>, BleError> {
    let mut events = bounded("subscribe", io_timeout, central.events()).await?;

    bounded("start scan", io_timeout, central.start_scan(ScanFilter::default())).await?;
    tracing::debug!(duration_secs = duration.as_secs(), "BLE scan started");

    let mut seen = HashSet::new();
    let deadline = tokio::time::Instant::now() + duration;

    while tokio::time::Instant::now() < deadline {
        let remaining = deadline - tokio::time::Instant::now();
        match tokio::time::timeout(remaining, events.next()).await {
            Ok(Some(event)) => {
                if let Some(id) = advertised_id(event) {
                    seen.insert(id);
                }
            }
            Ok(None) | Err(_) => break,
        }
    }

    bounded("stop scan", io_timeout, central.stop_scan()).await?;

    let peripherals = bounded("list peripherals", io_timeout, central.peripherals()).await?;
    let mut entries = Vec::with_capacity(seen.len());
    for peripheral in peripherals.iter().filter(|p| seen.contains(&p.id())) {
        match bounded("read properties", io_timeout, peripheral.properties()).await {
            Ok(Some(props)) => {
                tracing::trace!(
                    address = %props.address,
                    name = ?props.local_name,
                    "BLE advertisement"
                );
                entries.push(entry_from_properties(&props));
            }
            Ok(None) => {}
            Err(err) => {
                tracing::debug!(%err, "skipping peripheral without readable properties");
            }
        }
    }

    tracing::debug!(count = entries.len(), "BLE scan finished");
    Ok(entries)
}
