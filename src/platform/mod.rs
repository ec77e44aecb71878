//! Accessory registry and lifecycle callbacks
//!
//! The platform owns the plugin-local registry of accessories and keeps it
//! loosely synchronized with the host bridge: restoration repopulates it at
//! startup, the add/remove commands mutate it at runtime, and every mutation
//! that the host needs to know about goes through the [`BridgeApi`] seam.

use crate::accessory::{Accessory, AccessoryId, AckHandler, CapabilityKind, CapabilityValue};
use crate::bridge::{BridgeApi, RegisteredAccessory};
use crate::config::Config;
use crate::error::{PlatformError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The platform plugin: accessory registry plus host lifecycle handling
pub struct Platform {
    config: Config,
    bridge: Arc<dyn BridgeApi>,
    /// Insertion order is registration order
    accessories: Vec<Accessory>,
    launch_complete: bool,
}

impl Platform {
    /// Create a new platform with an empty registry
    pub fn new(config: Config, bridge: Arc<dyn BridgeApi>) -> Self {
        Self {
            config,
            bridge,
            accessories: Vec::new(),
            launch_complete: false,
        }
    }

    /// Accessories currently known to the plugin, in registration order
    pub fn accessories(&self) -> &[Accessory] {
        &self.accessories
    }

    /// Platform configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Look up an accessory by identifier
    pub fn accessory(&self, id: AccessoryId) -> Option<&Accessory> {
        self.accessories.iter().find(|a| a.id() == id)
    }

    /// Create and register a new accessory
    ///
    /// Falls back to the configured default name when none is supplied.
    /// Registration with the host happens before the registry append, so a
    /// failed host call leaves the registry untouched.
    pub fn add_accessory(&mut self, name: Option<&str>) -> Result<AccessoryId> {
        let name = name
            .unwrap_or(self.config.default_accessory_name.as_str())
            .to_string();
        let id = AccessoryId::from_name(&name);
        info!("Add accessory: {} ({})", name, id);

        if !self.launch_complete {
            // Host contract: new registrations are expected only after the
            // finished-launching signal. Not enforced, just visible.
            warn!("Adding accessory before launch completed");
        }

        if self.accessory(id).is_some() {
            return Err(PlatformError::DuplicateAccessory(name));
        }

        let mut accessory = Accessory::new(&name)
            .with_capability(CapabilityKind::Power, CapabilityValue::Bool(false));
        accessory.set_reachable(true);
        accessory.wire_identify(Arc::new(AckHandler));
        accessory.wire_capability(CapabilityKind::Power, Arc::new(AckHandler))?;

        self.bridge.register_accessories(
            &self.config.plugin_name,
            &self.config.platform_name,
            &[registered(&accessory)],
        )?;

        self.accessories.push(accessory);
        Ok(id)
    }

    /// Restoration hook: the host hands back a previously-known accessory
    ///
    /// The host already owns the accessory, so it is appended locally and
    /// never re-registered. Restored accessories are assumed serviceable and
    /// marked reachable unconditionally.
    pub fn configure_accessory(&mut self, mut accessory: Accessory) -> Result<()> {
        info!("Configure accessory: {}", accessory.display_name());

        if self.accessory(accessory.id()).is_some() {
            return Err(PlatformError::DuplicateAccessory(
                accessory.display_name().to_string(),
            ));
        }

        accessory.set_reachable(true);
        accessory.wire_identify(Arc::new(AckHandler));
        if accessory.has_capability(CapabilityKind::Power) {
            accessory.wire_capability(CapabilityKind::Power, Arc::new(AckHandler))?;
        }

        self.accessories.push(accessory);
        Ok(())
    }

    /// Mark every accessory unreachable, notifying the host per accessory
    ///
    /// Demonstration of the reachability-update path, not a liveness probe.
    /// A failed host notification does not stop the sweep: every accessory
    /// is flipped and attempted, and failures are reported collectively.
    pub fn update_reachability(&mut self) -> Result<()> {
        info!("Update reachability for {} accessories", self.accessories.len());

        let mut failures = 0usize;
        for accessory in &mut self.accessories {
            accessory.set_reachable(false);
            if let Err(e) = self.bridge.update_reachability(accessory.id(), false) {
                warn!(
                    "Reachability notification failed for {}: {}",
                    accessory.display_name(),
                    e
                );
                failures += 1;
            }
        }

        if failures > 0 {
            return Err(PlatformError::Registration(format!(
                "{} reachability notifications failed",
                failures
            )));
        }
        Ok(())
    }

    /// Unregister the entire registry from the host and clear it
    ///
    /// Returns the number of accessories removed. The host receives the full
    /// prior contents in a single unregistration call, under the same
    /// plugin/platform pair used for registration.
    pub fn remove_all(&mut self) -> Result<usize> {
        let removed: Vec<RegisteredAccessory> = self.accessories.iter().map(registered).collect();
        info!("Remove all: {} accessories", removed.len());

        self.bridge.unregister_accessories(
            &self.config.plugin_name,
            &self.config.platform_name,
            &removed,
        )?;

        self.accessories.clear();
        Ok(removed.len())
    }

    /// Host lifecycle signal: cached accessory restoration is complete
    pub fn finished_launching(&mut self) {
        debug!("Finished launching");
        self.launch_complete = true;
        info!(
            "Launch complete with {} restored accessories",
            self.accessories.len()
        );
    }
}

fn registered(accessory: &Accessory) -> RegisteredAccessory {
    RegisteredAccessory {
        id: accessory.id(),
        display_name: accessory.display_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::MockBridgeApi;

    fn platform_with(bridge: MockBridgeApi) -> Platform {
        let mut platform = Platform::new(Config::default(), Arc::new(bridge));
        platform.finished_launching();
        platform
    }

    fn restored(name: &str) -> Accessory {
        Accessory::new(name).with_capability(CapabilityKind::Power, CapabilityValue::Bool(false))
    }

    #[test]
    fn test_add_uses_default_name() {
        let mut bridge = MockBridgeApi::new();
        bridge
            .expect_register_accessories()
            .withf(|plugin, platform, accessories| {
                plugin == "lantern-platform"
                    && platform == "LanternPlatform"
                    && accessories.len() == 1
                    && accessories[0].display_name == "Test Accessory"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut platform = platform_with(bridge);
        platform.add_accessory(None).unwrap();

        assert_eq!(platform.accessories().len(), 1);
        let accessory = &platform.accessories()[0];
        assert_eq!(accessory.display_name(), "Test Accessory");
        assert!(accessory.is_reachable());
        assert!(accessory.has_capability(CapabilityKind::Power));
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut bridge = MockBridgeApi::new();
        bridge
            .expect_register_accessories()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut platform = platform_with(bridge);
        platform.add_accessory(Some("Porch Light")).unwrap();

        let result = platform.add_accessory(Some("Porch Light"));
        assert!(matches!(result, Err(PlatformError::DuplicateAccessory(_))));
        assert_eq!(platform.accessories().len(), 1);
    }

    #[test]
    fn test_add_registration_failure_leaves_registry_untouched() {
        let mut bridge = MockBridgeApi::new();
        bridge
            .expect_register_accessories()
            .times(1)
            .returning(|_, _, _| Err(PlatformError::Registration("bridge offline".into())));

        let mut platform = platform_with(bridge);
        let result = platform.add_accessory(None);
        assert!(matches!(result, Err(PlatformError::Registration(_))));
        assert!(platform.accessories().is_empty());
    }

    #[test]
    fn test_configure_accessory_never_registers() {
        // No register_accessories expectation: any call would panic
        let bridge = MockBridgeApi::new();
        let mut platform = Platform::new(Config::default(), Arc::new(bridge));

        platform.configure_accessory(restored("Porch Light")).unwrap();

        assert_eq!(platform.accessories().len(), 1);
        assert!(platform.accessories()[0].is_reachable());
    }

    #[test]
    fn test_update_reachability_marks_all_unreachable() {
        let mut bridge = MockBridgeApi::new();
        bridge
            .expect_update_reachability()
            .withf(|_, reachable| !reachable)
            .times(2)
            .returning(|_, _| Ok(()));

        let mut platform = platform_with(bridge);
        platform.configure_accessory(restored("Porch Light")).unwrap();
        platform.configure_accessory(restored("Door Sensor")).unwrap();

        platform.update_reachability().unwrap();
        assert!(platform.accessories().iter().all(|a| !a.is_reachable()));
    }

    #[test]
    fn test_update_reachability_continues_past_failures() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let mut bridge = MockBridgeApi::new();
        let calls = AtomicUsize::new(0);
        bridge
            .expect_update_reachability()
            .times(2)
            .returning(move |_, _| {
                // First notification fails, the sweep must still reach the rest
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(PlatformError::Registration("bridge offline".into()))
                } else {
                    Ok(())
                }
            });

        let mut platform = platform_with(bridge);
        platform.configure_accessory(restored("Porch Light")).unwrap();
        platform.configure_accessory(restored("Door Sensor")).unwrap();

        let result = platform.update_reachability();
        assert!(matches!(result, Err(PlatformError::Registration(_))));
        // Every entry was flipped despite the failure
        assert!(platform.accessories().iter().all(|a| !a.is_reachable()));
    }

    #[test]
    fn test_remove_all_passes_full_contents_once() {
        let mut bridge = MockBridgeApi::new();
        bridge
            .expect_register_accessories()
            .times(2)
            .returning(|_, _, _| Ok(()));
        bridge
            .expect_unregister_accessories()
            .withf(|plugin, platform, accessories| {
                plugin == "lantern-platform"
                    && platform == "LanternPlatform"
                    && accessories.len() == 2
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut platform = platform_with(bridge);
        platform.add_accessory(Some("Porch Light")).unwrap();
        platform.add_accessory(Some("Door Sensor")).unwrap();

        let removed = platform.remove_all().unwrap();
        assert_eq!(removed, 2);
        assert!(platform.accessories().is_empty());
    }

    #[test]
    fn test_remove_all_on_empty_registry() {
        let mut bridge = MockBridgeApi::new();
        bridge
            .expect_unregister_accessories()
            .withf(|_, _, accessories| accessories.is_empty())
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut platform = platform_with(bridge);
        assert_eq!(platform.remove_all().unwrap(), 0);
    }

    #[test]
    fn test_restored_and_added_agree_on_identity() {
        let mut bridge = MockBridgeApi::new();
        bridge
            .expect_register_accessories()
            .times(0)
            .returning(|_, _, _| Ok(()));

        let mut platform = platform_with(bridge);
        platform.configure_accessory(restored("Porch Light")).unwrap();

        // Same name after restoration derives the same id, so the add is a
        // duplicate of the restored accessory.
        let result = platform.add_accessory(Some("Porch Light"));
        assert!(matches!(result, Err(PlatformError::DuplicateAccessory(_))));
    }
}
