//! State change requests: what an operator asks a plug to do.

use serde::{Deserialize, Serialize};

use crate::plug_state::PlugState;

/// Operator intent for one control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateChangeRequest {
    /// Turn the plug on.
    Activate,
    /// Turn the plug off.
    Deactivate,
    /// Flip the current state; needs a read before the write.
    Toggle,
}

impl StateChangeRequest {
    /// The state to write when it does not depend on the current one.
    ///
    /// Returns `None` for [`Toggle`](Self::Toggle), whose target is the
    /// negation of the state read from the device.
    #[must_use]
    pub const fn fixed_target(self) -> Option<PlugState> {
        match self {
            Self::Activate => Some(PlugState::ON),
            Self::Deactivate => Some(PlugState::OFF),
            Self::Toggle => None,
        }
    }

    /// Whether the current state must be read before writing.
    #[must_use]
    pub const fn requires_read(self) -> bool {
        self.fixed_target().is_none()
    }

    /// Lowercase name used in URLs and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
            Self::Toggle => "toggle",
        }
    }
}

impl std::fmt::Display for StateChangeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
