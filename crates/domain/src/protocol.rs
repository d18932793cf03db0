//! Fixed protocol constants for Hue smart plugs.

/// GATT characteristic holding the plug power state (one byte, `0x00`/`0x01`).
pub const POWER_CHARACTERISTIC: uuid::Uuid =
    uuid::Uuid::from_u128(0x932c_32bd_0002_47a2_835a_a8d4_55b8_59dd);

/// Complete local name advertised by Hue smart plugs.
pub const SMART_PLUG_NAME: &str = "Hue smart plug";
