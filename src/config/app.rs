//! Application-level configuration.
//!
//! Contains user preferences that affect app-wide behavior:
//! - Window management (close to tray)
//! - Native notification rendering
//! - Remote content (start URL, trusted hosts, user agent)
//!
//! Values are read from the `app` key of `settings.json` (tauri-plugin-store).
//! Missing fields take their defaults; an unreadable entry falls back to the
//! defaults entirely.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tauri::AppHandle;
use tauri_plugin_store::StoreExt;

use crate::error::ShellResult;

/// Display name used for the tray tooltip and notification fallback title.
pub const APP_NAME: &str = "Steam Chat";

/// Settings store file, relative to the app data dir.
pub const SETTINGS_STORE: &str = "settings.json";

/// Key inside the settings store holding the serialized `AppConfig`.
const SETTINGS_KEY: &str = "app";

const DEFAULT_START_URL: &str = "https://steamcommunity.com/chat";

// The hosted chat refuses older engines, so report a current desktop Chrome.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36";

lazy_static! {
    /// Global app configuration.
    pub static ref APP_CONFIG: RwLock<AppConfig> = RwLock::new(AppConfig::default());
}

/// Application-wide user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Hide to the tray instead of closing when clicking X.
    pub close_to_tray: bool,

    /// Render native OS notifications for web notifications.
    /// The unread counter is maintained either way.
    pub native_notifications: bool,

    /// Page loaded into the main window.
    pub start_url: String,

    /// Hosts (and their subdomains) that stay inside the app window and may
    /// talk to the notification relay. Everything else opens externally.
    pub trusted_hosts: Vec<String>,

    /// User agent reported by the main webview.
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            close_to_tray: true,
            native_notifications: true,
            start_url: DEFAULT_START_URL.to_string(),
            trusted_hosts: vec![
                "steamcommunity.com".to_string(),
                "steampowered.com".to_string(),
            ],
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AppConfig {
    /// Build a config from the raw store entry, falling back to defaults.
    pub fn from_stored(value: Option<Value>) -> Self {
        match value.map(Self::parse) {
            None => Self::default(),
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("[APP_CONFIG] Ignoring invalid stored settings: {}", e);
                Self::default()
            },
        }
    }

    fn parse(value: Value) -> ShellResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

// ============================================================================
// Getters (for internal Rust use)
// ============================================================================

/// Check if close-to-tray is enabled.
pub fn is_close_to_tray() -> bool {
    APP_CONFIG.read().close_to_tray
}

/// Check if native notifications should be rendered.
pub fn native_notifications_enabled() -> bool {
    APP_CONFIG.read().native_notifications
}

/// Load the persisted configuration into `APP_CONFIG`.
///
/// A store that cannot be opened leaves the defaults in place.
pub fn load_from_store(app: &AppHandle) {
    let stored = match app.store(SETTINGS_STORE) {
        Ok(store) => store.get(SETTINGS_KEY),
        Err(e) => {
            log::warn!("[APP_CONFIG] Failed to open {}: {}", SETTINGS_STORE, e);
            None
        },
    };

    let config = AppConfig::from_stored(stored);
    log::debug!("[APP_CONFIG] Loaded {:?}", config);
    *APP_CONFIG.write() = config;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.close_to_tray);
        assert!(config.native_notifications);
        assert_eq!(config.start_url, "https://steamcommunity.com/chat");
        assert_eq!(config.trusted_hosts.len(), 2);
        assert!(config.user_agent.contains("Chrome/"));
    }

    #[test]
    fn test_from_stored_missing() {
        assert_eq!(AppConfig::from_stored(None), AppConfig::default());
    }

    #[test]
    fn test_from_stored_partial_keeps_defaults() {
        let config = AppConfig::from_stored(Some(json!({ "closeToTray": false })));
        assert!(!config.close_to_tray);
        assert!(config.native_notifications);
        assert_eq!(config.start_url, AppConfig::default().start_url);
    }

    #[test]
    fn test_from_stored_full() {
        let config = AppConfig::from_stored(Some(json!({
            "closeToTray": false,
            "nativeNotifications": false,
            "startUrl": "https://steamcommunity.com/chat/friends",
            "trustedHosts": ["steamcommunity.com"],
            "userAgent": "test-agent"
        })));
        assert!(!config.native_notifications);
        assert_eq!(config.trusted_hosts, vec!["steamcommunity.com".to_string()]);
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_from_stored_invalid_falls_back() {
        let config = AppConfig::from_stored(Some(json!({ "closeToTray": "yes" })));
        assert_eq!(config, AppConfig::default());

        let config = AppConfig::from_stored(Some(json!([1, 2, 3])));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_getters_follow_global() {
        *APP_CONFIG.write() = AppConfig::default();
        assert!(is_close_to_tray());
        assert!(native_notifications_enabled());

        APP_CONFIG.write().native_notifications = false;
        assert!(!native_notifications_enabled());

        *APP_CONFIG.write() = AppConfig::default();
    }
}
