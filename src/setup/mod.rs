//! Dynamic configuration UI request handler
//!
//! The host's setup UI drives a small request/response protocol: the plugin
//! answers either with a UI descriptor asking for input, or with a directive
//! telling the host to persist a configuration section. Each user-initiated
//! setup session is tracked explicitly, keyed by an opaque session token the
//! host supplies with every request.

use crate::error::{PlatformError, Result};
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

/// Marker written into the session context, echoed back verbatim by the host
/// on the next round. Demonstration of the context round-trip only; it never
/// changes behavior.
const SESSION_MARKER: &str = "Hello";

/// Stage of a setup session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    /// Waiting for the user to fill in the requested input
    AwaitingInput,
    /// Input arrived and is being applied
    InputReceived,
}

/// Request passed through from the host's setup UI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupRequest {
    /// User response from the previous UI round, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<SetupResponse>,
}

/// User response carried inside a setup request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupResponse {
    /// Values of the input fields the previous UI round asked for
    #[serde(default)]
    pub inputs: HashMap<String, String>,
}

/// Reply returned to the host's setup UI
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SetupReply {
    /// Show a UI and hand the session context back to the host
    Interface {
        /// UI descriptor to render
        ui: UiDescriptor,
        /// Session context the host echoes back on the next invocation
        context: serde_json::Value,
    },
    /// Persist a configuration section and finish the session
    Persist(ConfigDirective),
}

/// Descriptor for a setup UI screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiDescriptor {
    /// Descriptor type, always "Interface"
    #[serde(rename = "type")]
    pub kind: String,
    /// Interface style, e.g. "input"
    pub interface: String,
    /// Screen title
    pub title: String,
    /// Input fields to render
    pub items: Vec<UiItem>,
}

/// One input field of a setup UI screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiItem {
    /// Field identifier, echoed back as the key in `inputs`
    pub id: String,
    /// Field label
    pub title: String,
    /// Placeholder text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Directive asking the host to persist plugin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDirective {
    /// Configuration section to modify ("platform")
    pub section: String,
    /// Replace any existing entry for this platform
    pub replace: bool,
    /// Configuration payload to persist
    pub config: serde_json::Value,
}

struct Session {
    stage: SetupStage,
    marker: String,
}

/// Handler for the host's dynamic setup UI protocol
#[derive(Default)]
pub struct SetupHandler {
    sessions: HashMap<String, Session>,
}

impl SetupHandler {
    /// Create a new handler with no active sessions
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage of a session, if one is active for the token
    pub fn stage(&self, token: &str) -> Option<SetupStage> {
        self.sessions.get(token).map(|s| s.stage)
    }

    /// Handle one setup UI round for the given session token
    ///
    /// A request carrying `response.inputs.name` adds the named accessory and
    /// replies with a persistence directive, closing the session; any other
    /// request opens (or re-opens) the session and replies with the input UI.
    pub fn handle(
        &mut self,
        platform: &mut Platform,
        token: &str,
        request: &SetupRequest,
    ) -> Result<SetupReply> {
        let name = request
            .response
            .as_ref()
            .and_then(|r| r.inputs.get("name"))
            .map(String::as_str);

        match name {
            Some(name) if !name.trim().is_empty() => {
                if let Some(session) = self.sessions.get_mut(token) {
                    session.stage = SetupStage::InputReceived;
                }

                platform.add_accessory(Some(name))?;

                // One-shot flow: the next request on this token starts over
                self.sessions.remove(token);

                Ok(SetupReply::Persist(ConfigDirective {
                    section: "platform".to_string(),
                    replace: true,
                    config: json!({
                        "platform": platform.config().platform_name,
                        "otherConfig": "SomeData",
                    }),
                }))
            }
            // Blank input only counts as malformed when a UI round is
            // actually pending for this session
            Some(_) if self.sessions.contains_key(token) => Err(
                PlatformError::InvalidSetupInput("accessory name must not be blank".to_string()),
            ),
            _ => {
                let session = self.sessions.entry(token.to_string()).or_insert(Session {
                    stage: SetupStage::AwaitingInput,
                    marker: SESSION_MARKER.to_string(),
                });
                session.stage = SetupStage::AwaitingInput;

                Ok(SetupReply::Interface {
                    ui: input_descriptor(),
                    context: json!({ "marker": session.marker.clone() }),
                })
            }
        }
    }
}

fn input_descriptor() -> UiDescriptor {
    UiDescriptor {
        kind: "Interface".to_string(),
        interface: "input".to_string(),
        title: "Add Accessory".to_string(),
        items: vec![UiItem {
            id: "name".to_string(),
            title: "Name".to_string(),
            placeholder: Some("Fancy Light".to_string()),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::MockBridgeApi;
    use crate::config::Config;
    use std::sync::Arc;

    fn platform(bridge: MockBridgeApi) -> Platform {
        let mut platform = Platform::new(Config::default(), Arc::new(bridge));
        platform.finished_launching();
        platform
    }

    fn named_request(name: &str) -> SetupRequest {
        let mut inputs = HashMap::new();
        inputs.insert("name".to_string(), name.to_string());
        SetupRequest {
            response: Some(SetupResponse { inputs }),
        }
    }

    #[test]
    fn test_empty_request_returns_input_ui() {
        // Any add would trip the unset mock expectation
        let mut platform = platform(MockBridgeApi::new());
        let mut handler = SetupHandler::new();

        let reply = handler
            .handle(&mut platform, "session-1", &SetupRequest::default())
            .unwrap();

        match reply {
            SetupReply::Interface { ui, context } => {
                assert_eq!(ui.kind, "Interface");
                assert_eq!(ui.interface, "input");
                assert_eq!(ui.title, "Add Accessory");
                assert_eq!(ui.items.len(), 1);
                assert_eq!(ui.items[0].id, "name");
                assert_eq!(context["marker"], "Hello");
            }
            SetupReply::Persist(_) => panic!("Expected input UI"),
        }

        assert_eq!(handler.stage("session-1"), Some(SetupStage::AwaitingInput));
        assert!(platform.accessories().is_empty());
    }

    #[test]
    fn test_named_input_adds_and_persists() {
        let mut bridge = MockBridgeApi::new();
        bridge
            .expect_register_accessories()
            .withf(|_, _, accessories| {
                accessories.len() == 1 && accessories[0].display_name == "Foo"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut platform = platform(bridge);
        let mut handler = SetupHandler::new();

        // Open the session, then answer it
        handler
            .handle(&mut platform, "session-1", &SetupRequest::default())
            .unwrap();
        let reply = handler
            .handle(&mut platform, "session-1", &named_request("Foo"))
            .unwrap();

        match reply {
            SetupReply::Persist(directive) => {
                assert_eq!(directive.section, "platform");
                assert!(directive.replace);
                assert_eq!(directive.config["platform"], "LanternPlatform");
                assert_eq!(directive.config["otherConfig"], "SomeData");
            }
            SetupReply::Interface { .. } => panic!("Expected persistence directive"),
        }

        assert_eq!(platform.accessories().len(), 1);
        // One-shot: the session is gone until the user starts over
        assert_eq!(handler.stage("session-1"), None);
    }

    #[test]
    fn test_blank_name_is_invalid_input() {
        let mut platform = platform(MockBridgeApi::new());
        let mut handler = SetupHandler::new();

        handler
            .handle(&mut platform, "session-1", &SetupRequest::default())
            .unwrap();
        let result = handler.handle(&mut platform, "session-1", &named_request("   "));

        assert!(matches!(result, Err(PlatformError::InvalidSetupInput(_))));
        assert!(platform.accessories().is_empty());
    }

    #[test]
    fn test_blank_name_without_session_starts_fresh_round() {
        let mut platform = platform(MockBridgeApi::new());
        let mut handler = SetupHandler::new();

        // No prior UI round for this token: a blank name is not an error,
        // it opens a fresh input round.
        let reply = handler
            .handle(&mut platform, "fresh-token", &named_request("   "))
            .unwrap();

        assert!(matches!(reply, SetupReply::Interface { .. }));
        assert_eq!(handler.stage("fresh-token"), Some(SetupStage::AwaitingInput));
        assert!(platform.accessories().is_empty());
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut platform = platform(MockBridgeApi::new());
        let mut handler = SetupHandler::new();

        handler
            .handle(&mut platform, "session-1", &SetupRequest::default())
            .unwrap();
        assert_eq!(handler.stage("session-1"), Some(SetupStage::AwaitingInput));
        assert_eq!(handler.stage("session-2"), None);
    }

    #[test]
    fn test_ui_descriptor_wire_shape() {
        let json = serde_json::to_value(input_descriptor()).unwrap();
        assert_eq!(json["type"], "Interface");
        assert_eq!(json["items"][0]["placeholder"], "Fancy Light");
    }
}
