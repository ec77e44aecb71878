//! Configuration management
//!
//! This module handles parsing and validation of the platform plugin
//! configuration from TOML files. The configuration covers the control
//! listener bind address, the plugin/platform name pair used for host
//! registration, and optional seed accessories restored at startup.

use crate::error::{PlatformError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

/// Main configuration structure for the platform plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bind address for the HTTP control listener
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Plugin identifier used when registering accessories with the host
    #[serde(default = "default_plugin_name")]
    pub plugin_name: String,

    /// Platform identifier used when registering accessories with the host
    #[serde(default = "default_platform_name")]
    pub platform_name: String,

    /// Display name used when the add command supplies no name
    #[serde(default = "default_accessory_name")]
    pub default_accessory_name: String,

    /// Accessories handed back through the restoration hook at startup
    #[serde(default, rename = "accessory")]
    pub seed_accessories: Vec<SeedAccessory>,
}

/// A previously-known accessory restored at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAccessory {
    /// Display name (the stable identifier derives from this)
    pub name: String,

    /// Whether the accessory exposes the on/off power capability
    #[serde(default = "default_true")]
    pub power: bool,

    /// Opaque restoration context persisted by the host on our behalf
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            PlatformError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config = Self::parse(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse(toml: &str) -> Result<Self> {
        toml::from_str(toml)
            .map_err(|e| PlatformError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    /// Bind address for the control listener
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen_address.parse().map_err(|e| {
            PlatformError::Config(format!(
                "Invalid listen_address '{}': {}",
                self.listen_address, e
            ))
        })
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;

        if self.plugin_name.is_empty() {
            return Err(PlatformError::Config("plugin_name must not be empty".into()));
        }
        if self.platform_name.is_empty() {
            return Err(PlatformError::Config(
                "platform_name must not be empty".into(),
            ));
        }
        if self.default_accessory_name.is_empty() {
            return Err(PlatformError::Config(
                "default_accessory_name must not be empty".into(),
            ));
        }

        for seed in &self.seed_accessories {
            if seed.name.is_empty() {
                return Err(PlatformError::Config(
                    "seed accessory name must not be empty".into(),
                ));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            plugin_name: default_plugin_name(),
            platform_name: default_platform_name(),
            default_accessory_name: default_accessory_name(),
            seed_accessories: Vec::new(),
        }
    }
}

// Default value functions for serde
fn default_listen_address() -> String {
    "127.0.0.1:18081".to_string()
}

fn default_plugin_name() -> String {
    "lantern-platform".to_string()
}

fn default_platform_name() -> String {
    "LanternPlatform".to_string()
}

fn default_accessory_name() -> String {
    "Test Accessory".to_string()
}

fn default_true() -> bool {
    true
}
