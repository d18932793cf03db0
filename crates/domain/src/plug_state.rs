//! Plug state: the power state of a smart plug and its wire codec.
//!
//! The power characteristic holds a single byte: `0x00` for off and `0x01`
//! for on. Any other value is rejected.

use serde::{Deserialize, Serialize};

use crate::error::InvalidStateEncodingError;

const OFF_BYTE: u8 = 0x00;
const ON_BYTE: u8 = 0x01;

/// Power state of a smart plug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlugState {
    /// Whether the plug is powered.
    pub on: bool,
}

impl PlugState {
    /// The plug is powered.
    pub const ON: Self = Self { on: true };
    /// The plug is not powered.
    pub const OFF: Self = Self { on: false };

    /// Wire representation of this state.
    #[must_use]
    pub const fn encode(self) -> u8 {
        if self.on { ON_BYTE } else { OFF_BYTE }
    }

    /// Parse a single wire byte.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateEncodingError`] for any byte other than `0x00`
    /// or `0x01`.
    pub fn decode(byte: u8) -> Result<Self, InvalidStateEncodingError> {
        match byte {
            OFF_BYTE => Ok(Self::OFF),
            ON_BYTE => Ok(Self::ON),
            other => Err(InvalidStateEncodingError {
                payload: vec![other],
            }),
        }
    }

    /// Parse a raw characteristic value, which must be exactly one byte.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateEncodingError`] when the payload is empty,
    /// longer than one byte, or holds an invalid byte.
    pub fn decode_payload(payload: &[u8]) -> Result<Self, InvalidStateEncodingError> {
        match payload {
            [byte] => Self::decode(*byte),
            _ => Err(InvalidStateEncodingError {
                payload: payload.to_vec(),
            }),
        }
    }

    /// The opposite state.
    #[must_use]
    pub const fn negate(self) -> Self {
        Self { on: !self.on }
    }
}

impl std::ops::Not for PlugState {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl From<bool> for PlugState {
    fn from(on: bool) -> Self {
        Self { on }
    }
}

impl From<PlugState> for u8 {
    fn from(state: PlugState) -> Self {
        state.encode()
    }
}

impl TryFrom<u8> for PlugState {
    type Error = InvalidStateEncodingError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::decode(byte)
    }
}

impl std::fmt::Display for PlugState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.on { "on" } else { "off" })
    }
}
