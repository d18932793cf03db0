//! # plughub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **transport port** that radio adapters implement:
//!   - `Transport`: scan, connect, exclusive radio access
//!   - `Connection`: characteristic read/write, disconnect
//! - Define the **retry policy** applied to transient disconnects
//! - Provide the **plug controller** use-case (`PlugService`):
//!   list smart plugs, change a plug's power state
//!
//! ## Dependency rule
//! Depends on `plughub-domain` only (plus `tokio::sync` / `tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod retry;
pub mod services;
