//! Host bridge framework interface
//!
//! This module abstracts the smart-home bridge runtime that loads the
//! plugin. The bridge owns the accessory/characteristic object model and
//! persists configuration on the plugin's behalf; the plugin only talks to
//! it through this seam.

use crate::accessory::AccessoryId;
use crate::error::Result;
use tracing::info;

/// Host bridge registration API consumed by the platform
#[cfg_attr(test, mockall::automock)]
pub trait BridgeApi: Send + Sync {
    /// Announce newly created accessories to the host
    ///
    /// `plugin` and `platform` are the well-known names the host files the
    /// accessories under. The same pair must be used for unregistration.
    fn register_accessories(
        &self,
        plugin: &str,
        platform: &str,
        accessories: &[RegisteredAccessory],
    ) -> Result<()>;

    /// Remove a set of accessories from the host in one call
    fn unregister_accessories(
        &self,
        plugin: &str,
        platform: &str,
        accessories: &[RegisteredAccessory],
    ) -> Result<()>;

    /// Notify the host that an accessory's reachability changed
    fn update_reachability(&self, id: AccessoryId, reachable: bool) -> Result<()>;
}

/// The accessory attributes the host needs for (un)registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredAccessory {
    /// Stable identifier
    pub id: AccessoryId,
    /// Display name
    pub display_name: String,
}

/// Bridge implementation for standalone runs: logs each call and succeeds
///
/// Useful when the plugin runs outside a live bridge, e.g. while exercising
/// the control surface by hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingBridge;

impl LoggingBridge {
    /// Create a new logging bridge
    pub fn new() -> Self {
        Self
    }
}

impl BridgeApi for LoggingBridge {
    fn register_accessories(
        &self,
        plugin: &str,
        platform: &str,
        accessories: &[RegisteredAccessory],
    ) -> Result<()> {
        for accessory in accessories {
            info!(
                "Bridge register: {} ({}) under {}/{}",
                accessory.display_name, accessory.id, plugin, platform
            );
        }
        Ok(())
    }

    fn unregister_accessories(
        &self,
        plugin: &str,
        platform: &str,
        accessories: &[RegisteredAccessory],
    ) -> Result<()> {
        info!(
            "Bridge unregister: {} accessories under {}/{}",
            accessories.len(),
            plugin,
            platform
        );
        Ok(())
    }

    fn update_reachability(&self, id: AccessoryId, reachable: bool) -> Result<()> {
        info!("Bridge reachability: {} -> {}", id, reachable);
        Ok(())
    }
}
