//! Notification bridge between the hosted page and the host.
//!
//! The page half is `notification_bridge.js`, injected as an initialization
//! script. It tags every message it posts with a private source tag that is
//! generated once per launch. The host half (`relay`) accepts only envelopes
//! carrying that tag from the main webview on a trusted origin, and turns
//! them into [`relay::Signal`]s for the notification controller.

pub mod relay;


use uuid::Uuid;

const BRIDGE_SCRIPT: &str = include_str!("notification_bridge.js");

/// Prefix of the private source tag.
const SOURCE_PREFIX: &str = "steam-desktop-bridge";

/// IPC command the page half invokes.
pub const RELAY_COMMAND: &str = "bridge_message";

/// Name of the empty, frozen object exposed to the page.
pub const EXPOSED_NAME: &str = "steamDesktop";

/// Per-launch bridge identity, managed as Tauri state.
#[derive(Debug, Clone)]
pub struct Bridge {
    source: String,
    install_marker: String,
}

impl Bridge {
    /// Create a bridge with a fresh random source tag.
    pub fn new() -> Self {
        Self::with_source(format!("{}-{}", SOURCE_PREFIX, Uuid::new_v4()))
    }

    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            install_marker: Uuid::new_v4().to_string(),
        }
    }

    /// The private tag every bridge message must carry.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the initialization script for the main webview.
    pub fn script(&self) -> String {
        BRIDGE_SCRIPT
            .replace("__BRIDGE_SOURCE__", &js_string(&self.source))
            .replace("__RELAY_COMMAND__", &js_string(RELAY_COMMAND))
            .replace("__EXPOSED_NAME__", &js_string(EXPOSED_NAME))
            .replace("__INSTALL_MARKER__", &js_string(&self.install_marker))
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote a string as a JavaScript literal.
fn js_string(value: &str) -> String {
    // JSON string literals are valid JS string literals.
    serde_json::Value::String(value.to_string()).to_string()
}
