//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;

use axum::Router;
use axum::routing::get;

use plughub_app::ports::Transport;

use crate::state::AppState;

/// Build the device sub-router.
pub fn routes<T>() -> Router<AppState<T>>
where
    T: Transport + 'static,
{
    Router::new()
        .route("/devices", get(devices::list::<T>))
        .route("/devices/{id}/{intent}", get(devices::set_state::<T>))
}
