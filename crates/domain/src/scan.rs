//! Scan entry: one BLE advertisement observed during a scan.

use serde::{Deserialize, Serialize};

use crate::protocol::SMART_PLUG_NAME;

/// Whether a BLE address is vendor-assigned or locally generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    /// Vendor-assigned, stable address.
    Public,
    /// Locally generated address, potentially rotating.
    Random,
}

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::Random => f.write_str("random"),
        }
    }
}

/// A single advertisement seen during one scan.
///
/// Produced fresh on every scan and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    address: String,
    address_type: AddressType,
    advertised_name: Option<String>,
}

impl ScanEntry {
    /// Build an entry from what the radio reported.
    pub fn new(
        address: impl Into<String>,
        address_type: AddressType,
        advertised_name: Option<String>,
    ) -> Self {
        Self {
            address: address.into(),
            address_type,
            advertised_name,
        }
    }

    /// Device address, e.g. `AA:BB:CC:DD:EE:FF`.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Whether the address is vendor-assigned or locally generated.
    #[must_use]
    pub fn address_type(&self) -> AddressType {
        self.address_type
    }

    /// Complete local name from the advertisement, if any.
    #[must_use]
    pub fn advertised_name(&self) -> Option<&str> {
        self.advertised_name.as_deref()
    }

    /// Whether the address matches `identifier`, ignoring ASCII case.
    #[must_use]
    pub fn has_address(&self, identifier: &str) -> bool {
        self.address.eq_ignore_ascii_case(identifier)
    }

    /// Whether this advertisement looks like a Hue smart plug.
    ///
    /// A naming and address-type convention: the address must be random and
    /// the complete local name must be exactly [`SMART_PLUG_NAME`]. A missing
    /// name never matches.
    #[must_use]
    pub fn is_smart_plug(&self) -> bool {
        self.address_type == AddressType::Random
            && self.advertised_name.as_deref().unwrap_or_default() == SMART_PLUG_NAME
    }
}
