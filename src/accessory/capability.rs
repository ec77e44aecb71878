//! Capability kinds, values and their change handlers
//!
//! Capabilities are dispatched generically by kind rather than through
//! per-capability conditionals, so new kinds only need a variant and a
//! handler wired at setup time.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Kind of capability an accessory can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// On/off switch state
    Power,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Power => write!(f, "power"),
        }
    }
}

/// Current value of a capability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapabilityValue {
    /// Boolean state (power on/off)
    Bool(bool),
}

impl fmt::Display for CapabilityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// Handler invoked when the host sets a capability value
///
/// The handler runs before the new value is stored; returning an error
/// rejects the change.
pub trait CapabilityHandler: Send + Sync {
    /// React to a value change on the named accessory
    fn on_set(&self, accessory: &str, kind: CapabilityKind, value: &CapabilityValue)
        -> Result<()>;
}

/// Handler invoked when the host asks an accessory to identify itself
pub trait IdentifyHandler: Send + Sync {
    /// React to an identify request on the named accessory
    fn identify(&self, accessory: &str, paired: bool) -> Result<()>;
}

/// Default handler that acknowledges immediately after logging the event
#[derive(Debug, Default, Clone, Copy)]
pub struct AckHandler;

impl CapabilityHandler for AckHandler {
    fn on_set(
        &self,
        accessory: &str,
        kind: CapabilityKind,
        value: &CapabilityValue,
    ) -> Result<()> {
        info!("{}: {} -> {}", accessory, kind, value);
        Ok(())
    }
}

impl IdentifyHandler for AckHandler {
    fn identify(&self, accessory: &str, paired: bool) -> Result<()> {
        info!("{}: identify (paired: {})", accessory, paired);
        Ok(())
    }
}
