//! # plughubd: plughub daemon
//!
//! Composition root that wires the BLE transport to the HTTP API and starts
//! the server.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Install the `tracing` subscriber
//! - Refuse to start without the privileges the BLE stack needs
//! - Open the BLE adapter and construct the plug service around it
//! - Build the axum router, injecting the service
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod privileges;

use plughub_adapter_ble::BleTransport;
use plughub_adapter_http_axum::state::AppState;
use plughub_app::services::plug_service::PlugService;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    if config.privileges.require_root {
        if let Err(err) = privileges::ensure_root() {
            tracing::error!(error = %err, "startup aborted");
            return Err(err.into());
        }
    }

    // Transport
    let transport = BleTransport::new(config.ble.clone()).await?;

    // Services
    let plug_service = PlugService::new(transport, config.retry_policy(), config.scan_duration());

    // HTTP
    let app = plughub_adapter_http_axum::router::build(AppState::new(plug_service));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "plughubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("plughubd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
