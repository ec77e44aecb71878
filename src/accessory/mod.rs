//! Accessory data model
//!
//! An accessory is one bridged device exposed to the smart-home ecosystem.
//! Its identifier derives deterministically from the display name, so the
//! same name always maps to the same accessory across restarts.

mod capability;

pub use capability::{
    AckHandler, CapabilityHandler, CapabilityKind, CapabilityValue, IdentifyHandler,
};

use crate::error::{PlatformError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Namespace under which accessory identifiers are derived
const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x9a8c_1c02_6aa4_4d5f_b0ab_23e2_41d5_6f83);

/// Stable accessory identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessoryId(Uuid);

impl AccessoryId {
    /// Derive the identifier for a display name
    ///
    /// UUID v5 over a fixed namespace: deterministic, so restored and
    /// freshly-added accessories with the same name agree on identity.
    pub fn from_name(name: &str) -> Self {
        Self(Uuid::new_v5(&ACCESSORY_NAMESPACE, name.as_bytes()))
    }
}

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One bridged device exposed to the host framework
pub struct Accessory {
    id: AccessoryId,
    display_name: String,
    reachable: bool,
    capabilities: HashMap<CapabilityKind, CapabilityValue>,
    handlers: HashMap<CapabilityKind, Arc<dyn CapabilityHandler>>,
    identify_handler: Option<Arc<dyn IdentifyHandler>>,
    context: serde_json::Value,
}

impl Accessory {
    /// Create a new accessory with no capabilities wired
    pub fn new(display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            id: AccessoryId::from_name(&display_name),
            display_name,
            reachable: false,
            capabilities: HashMap::new(),
            handlers: HashMap::new(),
            identify_handler: None,
            context: serde_json::Value::Null,
        }
    }

    /// Expose a capability with an initial value
    pub fn with_capability(mut self, kind: CapabilityKind, value: CapabilityValue) -> Self {
        self.capabilities.insert(kind, value);
        self
    }

    /// Attach an opaque restoration context blob
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }

    /// Stable identifier
    pub fn id(&self) -> AccessoryId {
        self.id
    }

    /// Display name
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Whether the plugin currently believes it can service this accessory
    pub fn is_reachable(&self) -> bool {
        self.reachable
    }

    /// Update the reachability flag
    pub fn set_reachable(&mut self, reachable: bool) {
        self.reachable = reachable;
    }

    /// Whether the accessory exposes the given capability
    pub fn has_capability(&self, kind: CapabilityKind) -> bool {
        self.capabilities.contains_key(&kind)
    }

    /// Current value of a capability, if exposed
    pub fn capability(&self, kind: CapabilityKind) -> Option<CapabilityValue> {
        self.capabilities.get(&kind).copied()
    }

    /// Opaque restoration context
    pub fn context(&self) -> &serde_json::Value {
        &self.context
    }

    /// Wire a change handler for an exposed capability
    pub fn wire_capability(
        &mut self,
        kind: CapabilityKind,
        handler: Arc<dyn CapabilityHandler>,
    ) -> Result<()> {
        if !self.capabilities.contains_key(&kind) {
            return Err(PlatformError::CapabilityNotExposed(format!(
                "{} does not expose {}",
                self.display_name, kind
            )));
        }
        self.handlers.insert(kind, handler);
        Ok(())
    }

    /// Wire the identify handler
    pub fn wire_identify(&mut self, handler: Arc<dyn IdentifyHandler>) {
        self.identify_handler = Some(handler);
    }

    /// Set a capability value, dispatching to the wired handler first
    pub fn set_capability(&mut self, kind: CapabilityKind, value: CapabilityValue) -> Result<()> {
        if !self.capabilities.contains_key(&kind) {
            return Err(PlatformError::CapabilityNotExposed(format!(
                "{} does not expose {}",
                self.display_name, kind
            )));
        }
        if let Some(handler) = self.handlers.get(&kind) {
            handler.on_set(&self.display_name, kind, &value)?;
        }
        self.capabilities.insert(kind, value);
        Ok(())
    }

    /// Handle an identify request from the host
    pub fn identify(&self, paired: bool) -> Result<()> {
        match &self.identify_handler {
            Some(handler) => handler.identify(&self.display_name, paired),
            // Unwired identify is a plain acknowledgement
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Accessory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessory")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("reachable", &self.reachable)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}
