//! # plughub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small JSON API: a service banner, a health check, the list of
//!   nearby smart plugs and one route per plug to change its power state
//! - Map HTTP requests into [`PlugService`](plughub_app::services::plug_service::PlugService)
//!   calls (driving adapter)
//! - Map core errors into HTTP status codes
//!
//! ## Dependency rule
//! Depends on `plughub-app` (for the port traits and the service) and
//! `plughub-domain` (for the request/response types). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
