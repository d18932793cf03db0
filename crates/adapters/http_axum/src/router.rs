//! Axum router assembly.

use axum::Json;
use axum::Router;
use axum::routing::get;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use plughub_app::ports::Transport;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Serves the service banner at `/`, the health check and the device routes.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<T>(state: AppState<T>) -> Router
where
    T: Transport + 'static,
{
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn banner() -> Json<Value> {
    Json(json!({ "service": "plughub" }))
}

async fn health_check() -> &'static str {
    "OK"
}
