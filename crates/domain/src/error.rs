//! Error taxonomy shared across the workspace.
//!
//! Each failure mode is a typed error; the HTTP adapter maps them to status
//! codes at the boundary. Only [`PlugError::Disconnected`] is considered
//! transient (see `plughub_app::retry`).

/// Boxed source error carried by the transport variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error for every core operation.
#[derive(Debug, thiserror::Error)]
pub enum PlugError {
    /// Adapter or radio fault. Never retried.
    #[error("BLE transport failure")]
    Transport(#[source] BoxError),

    /// Transient link loss while scanning, connecting, reading or writing.
    #[error("BLE device disconnected")]
    Disconnected(#[source] BoxError),

    /// The device was reached but does not expose the expected characteristic.
    #[error("characteristic not found")]
    CharacteristicNotFound(#[from] CharacteristicNotFoundError),

    /// The device returned a state value outside the two valid encodings.
    #[error("invalid plug state encoding")]
    InvalidStateEncoding(#[from] InvalidStateEncodingError),

    /// No discovered smart plug matches the requested identifier.
    #[error("device not found")]
    NotFound(#[from] NotFoundError),

    /// More than one discovered smart plug matches the requested identifier.
    #[error("ambiguous device match")]
    AmbiguousMatch(#[from] AmbiguousMatchError),
}

impl PlugError {
    /// Wrap an adapter/radio fault.
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }

    /// Wrap a transient link loss.
    pub fn disconnected(err: impl Into<BoxError>) -> Self {
        Self::Disconnected(err.into())
    }

    /// Whether this error is a transient disconnect.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected(_))
    }
}

/// A GATT characteristic is missing from the connected device.
#[derive(Debug, thiserror::Error)]
#[error("characteristic {uuid} not found on device")]
pub struct CharacteristicNotFoundError {
    /// UUID that was looked up.
    pub uuid: uuid::Uuid,
}

/// A characteristic payload is not a valid plug state.
#[derive(Debug, thiserror::Error)]
#[error("invalid plug state payload {payload:02x?}")]
pub struct InvalidStateEncodingError {
    /// The raw bytes that were read.
    pub payload: Vec<u8>,
}

/// Resolution found no device for an identifier.
#[derive(Debug, thiserror::Error)]
#[error("no smart plug found with address {identifier}")]
pub struct NotFoundError {
    /// The identifier that was requested.
    pub identifier: String,
}

/// Resolution found several devices for an identifier.
#[derive(Debug, thiserror::Error)]
#[error("{count} smart plugs match address {identifier}")]
pub struct AmbiguousMatchError {
    /// The identifier that was requested.
    pub identifier: String,
    /// How many discovered devices matched.
    pub count: usize,
}
