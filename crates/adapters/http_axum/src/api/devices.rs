//! JSON handlers for smart plugs.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use plughub_app::ports::Transport;
use plughub_domain::intent::StateChangeRequest;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    /// Addresses of the smart plugs seen during the scan.
    Ok(Json<Vec<String>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the state change endpoint.
pub enum SetStateResponse {
    Ok,
}

impl IntoResponse for SetStateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok => Json("Ok").into_response(),
        }
    }
}

/// `GET /devices`
pub async fn list<T>(State(state): State<AppState<T>>) -> Result<ListResponse, ApiError>
where
    T: Transport + 'static,
{
    let plugs = state.plug_service.list_plugs().await?;
    let addresses = plugs
        .iter()
        .map(|plug| plug.address().to_string())
        .collect();
    Ok(ListResponse::Ok(Json(addresses)))
}

/// `GET /devices/{id}/{intent}`
///
/// `intent` is one of `activate`, `deactivate` or `toggle`; anything else is
/// rejected with `400 Bad Request` before the radio is touched.
pub async fn set_state<T>(
    State(state): State<AppState<T>>,
    Path((id, intent)): Path<(String, StateChangeRequest)>,
) -> Result<SetStateResponse, ApiError>
where
    T: Transport + 'static,
{
    state.plug_service.set_state(&id, intent).await?;
    Ok(SetStateResponse::Ok)
}
