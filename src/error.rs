//! Error types for lantern-platform
//!
//! This module defines the error types used throughout the application.
//! We use `thiserror` for ergonomic error definitions and `anyhow` for
//! error propagation in application code.

use thiserror::Error;

/// Main error type for platform operations
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Host bridge registration/unregistration failures
    #[error("Registration failed: {0}")]
    Registration(String),

    /// An accessory with the same identifier already exists in the registry
    #[error("Duplicate accessory: {0}")]
    DuplicateAccessory(String),

    /// Accessory does not expose the requested capability
    #[error("Capability not exposed: {0}")]
    CapabilityNotExposed(String),

    /// Malformed input from the dynamic setup UI
    #[error("Invalid setup input: {0}")]
    InvalidSetupInput(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias using PlatformError
pub type Result<T> = std::result::Result<T, PlatformError>;

impl From<serde_json::Error> for PlatformError {
    fn from(err: serde_json::Error) -> Self {
        PlatformError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for PlatformError {
    fn from(err: toml::de::Error) -> Self {
        PlatformError::Config(err.to_string())
    }
}
