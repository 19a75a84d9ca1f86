//! Domain-based type organization
//!
//! Types are organized by domain to match the structure in `update/`:
//! - common: Overlay and notification UI state
//! - config: Device configuration map and sync state machine
//! - error: Request and validation errors
//! - form: Configuration form model, serializer and toggles
//! - status: Telemetry snapshot and its formatted view
//! - wifi: WiFi scan results

pub mod common;
pub mod config;
pub mod error;
pub mod form;
pub mod status;
pub mod wifi;

pub use common::*;
pub use config::*;
pub use error::*;
pub use form::*;
pub use status::*;
pub use wifi::*;
