//! # plughub-domain
//!
//! Pure domain model for the plughub smart plug controller.
//!
//! ## Responsibilities
//! - Foundational types: error taxonomy, fixed protocol constants
//! - Define **scan entries** (BLE advertisements observed during a scan)
//! - Define the **plug state** and its single-byte wire codec
//! - Define **state change requests** (`activate`, `deactivate`, `toggle`)
//! - Select likely smart plugs from a scan (**device filter**)
//! - Resolve a user-supplied identifier to exactly one device (**resolution**)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod protocol;

pub mod filter;
pub mod intent;
pub mod plug_state;
pub mod resolve;
pub mod scan;
