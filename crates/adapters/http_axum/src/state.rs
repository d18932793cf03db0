//! Shared application state for axum handlers.

use std::sync::Arc;

use plughub_app::ports::Transport;
use plughub_app::services::plug_service::PlugService;

/// Application state shared across all axum handlers.
///
/// Generic over the transport to avoid dynamic dispatch. `Clone` is
/// implemented manually so the transport itself does not need to be `Clone`.
pub struct AppState<T> {
    /// Smart plug discovery and control.
    pub plug_service: Arc<PlugService<T>>,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            plug_service: Arc::clone(&self.plug_service),
        }
    }
}

impl<T> AppState<T>
where
    T: Transport + 'static,
{
    /// Create a new application state from the plug service.
    pub fn new(plug_service: PlugService<T>) -> Self {
        Self {
            plug_service: Arc::new(plug_service),
        }
    }
}
