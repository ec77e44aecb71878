//! lantern-platform: Sample smart-home bridge platform plugin
//!
//! This library implements a minimal platform plugin for a smart-home bridge
//! framework. It keeps an in-memory registry of bridged accessories, drives
//! the host framework's registration APIs through the [`bridge::BridgeApi`]
//! seam, and exposes a small local HTTP control surface for adding, removing
//! and reachability-toggling accessories at runtime.
//!
//! # Architecture
//!
//! The plugin is deliberately a control-plane stub: all logic is sequential
//! glue between the control listener, the accessory registry and the host
//! bridge. The host framework itself (accessory model persistence, event
//! dispatch) stays behind the `BridgeApi` trait; a logging stand-in is
//! provided for standalone runs.
//!
//! # Modules
//!
//! - `accessory`: Accessory data model and capability handlers
//! - `bridge`: Host bridge framework interface
//! - `platform`: Accessory registry and lifecycle callbacks
//! - `setup`: Dynamic configuration UI request handler
//! - `control`: Local HTTP control listener
//! - `config`: Configuration parsing and management
//! - `error`: Error types and handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accessory;
pub mod bridge;
pub mod config;
pub mod control;
pub mod error;
pub mod platform;
pub mod setup;

// Re-export commonly used types
pub use error::{PlatformError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
