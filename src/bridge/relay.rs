//! Host half of the message relay.
//!
//! The page forwards tagged envelopes through the `bridge_message` command.
//! An envelope becomes a [`Signal`] only when it comes from the main webview
//! on a trusted https origin and carries this launch's source tag. Anything
//! else is dropped without a reply.

use serde::Deserialize;
use serde_json::Value;
use tauri::{AppHandle, State, Url, Webview};

use super::Bridge;
use crate::app::window::MAIN_WINDOW_LABEL;
use crate::config::APP_CONFIG;
use crate::links;
use crate::notifications::{self, NotificationPayload};

/// Signals the bridge delivers to the notification controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// `notification-from-web`: the page constructed a notification.
    NotificationFromWeb(NotificationPayload),
    /// `notification-click`: the user clicked the page-rendered notification.
    NotificationClick,
}

impl Signal {
    pub fn name(&self) -> &'static str {
        match self {
            Signal::NotificationFromWeb(_) => "notification-from-web",
            Signal::NotificationClick => "notification-click",
        }
    }
}

/// Wire shape of a page message.
#[derive(Debug, Deserialize)]
struct Envelope {
    source: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<NotificationPayload>,
}

impl Bridge {
    /// Translate a page message into a signal, or `None` if it is foreign or
    /// malformed.
    pub fn route(&self, message: Value) -> Option<Signal> {
        let envelope: Envelope = match serde_json::from_value(message) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::debug!("[BRIDGE] Dropping malformed message: {}", e);
                return None;
            },
        };

        if envelope.source != self.source() {
            log::debug!("[BRIDGE] Dropping message with foreign source tag");
            return None;
        }

        match envelope.kind.as_str() {
            "notification" => Some(Signal::NotificationFromWeb(
                envelope.payload.unwrap_or_default(),
            )),
            "notification-click" => Some(Signal::NotificationClick),
            other => {
                log::debug!("[BRIDGE] Dropping unknown message type {:?}", other);
                None
            },
        }
    }
}

/// Only the main webview, while on a trusted https page, may use the relay.
pub(crate) fn accepts_sender(label: &str, url: Option<&Url>, trusted_hosts: &[String]) -> bool {
    label == MAIN_WINDOW_LABEL
        && url.is_some_and(|url| links::is_trusted_origin(url, trusted_hosts))
}

/// Deliver a signal to the notification controller.
pub fn dispatch(app: &AppHandle, signal: Signal) {
    log::debug!("[BRIDGE] Relaying {}", signal.name());
    match signal {
        Signal::NotificationFromWeb(payload) => notifications::handle_web_notification(app, payload),
        Signal::NotificationClick => notifications::handle_web_notification_click(app),
    }
}

/// Relay entry point invoked by the page half of the bridge.
///
/// Fire-and-forget: the page never learns whether the message was accepted.
#[tauri::command]
pub fn bridge_message(app: AppHandle, webview: Webview, bridge: State<'_, Bridge>, message: Value) {
    let url = webview.url().ok();
    let trusted = accepts_sender(
        webview.label(),
        url.as_ref(),
        &APP_CONFIG.read().trusted_hosts,
    );
    if !trusted {
        log::debug!(
            "[BRIDGE] Ignoring message from webview {:?} at {:?}",
            webview.label(),
            url.as_ref().map(Url::as_str)
        );
        return;
    }

    if let Some(signal) = bridge.route(message) {
        dispatch(&app, signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bridge() -> Bridge {
        Bridge::with_source("steam-desktop-bridge-test")
    }

    fn trusted() -> Vec<String> {
        vec!["steamcommunity.com".to_string()]
    }

    #[test]
    fn test_hello_world_is_relayed() {
        let signal = bridge().route(json!({
            "source": "steam-desktop-bridge-test",
            "type": "notification",
            "payload": { "title": "Hello", "body": "World" }
        }));

        assert_eq!(
            signal,
            Some(Signal::NotificationFromWeb(NotificationPayload {
                title: "Hello".to_string(),
                body: "World".to_string(),
            }))
        );
    }

    #[test]
    fn test_click_is_relayed() {
        let signal = bridge().route(json!({
            "source": "steam-desktop-bridge-test",
            "type": "notification-click"
        }));
        assert_eq!(signal, Some(Signal::NotificationClick));
        assert_eq!(Signal::NotificationClick.name(), "notification-click");
    }

    #[test]
    fn test_missing_payload_defaults_to_empty() {
        for payload in [json!(null), json!({})] {
            let signal = bridge().route(json!({
                "source": "steam-desktop-bridge-test",
                "type": "notification",
                "payload": payload
            }));
            assert_eq!(
                signal,
                Some(Signal::NotificationFromWeb(NotificationPayload::default()))
            );
        }

        let signal = bridge().route(json!({
            "source": "steam-desktop-bridge-test",
            "type": "notification"
        }));
        assert!(matches!(signal, Some(Signal::NotificationFromWeb(_))));
    }

    #[test]
    fn test_foreign_source_is_dropped() {
        for source in ["", "steam-desktop-bridge", "react-devtools", "steam-desktop-bridge-other"] {
            let signal = bridge().route(json!({
                "source": source,
                "type": "notification",
                "payload": { "title": "Hello", "body": "World" }
            }));
            assert_eq!(signal, None, "source {:?} must not be relayed", source);
        }
    }

    #[test]
    fn test_malformed_messages_are_dropped() {
        let cases = [
            json!(null),
            json!("notification"),
            json!(42),
            json!({ "type": "notification" }),
            json!({ "source": "steam-desktop-bridge-test" }),
            json!({ "source": "steam-desktop-bridge-test", "type": "unread" }),
            json!({ "source": "steam-desktop-bridge-test", "type": "notification", "payload": "x" }),
            json!({ "source": 7, "type": "notification-click" }),
        ];

        for case in cases {
            assert_eq!(bridge().route(case.clone()), None, "{} must be dropped", case);
        }
    }

    #[test]
    fn test_sender_must_be_main_webview_on_trusted_https() {
        let chat = Url::parse("https://steamcommunity.com/chat").unwrap();
        let plain = Url::parse("http://steamcommunity.com/chat").unwrap();
        let other = Url::parse("https://example.com/").unwrap();

        assert!(accepts_sender("main", Some(&chat), &trusted()));
        assert!(!accepts_sender("popup", Some(&chat), &trusted()));
        assert!(!accepts_sender("main", Some(&plain), &trusted()));
        assert!(!accepts_sender("main", Some(&other), &trusted()));
        assert!(!accepts_sender("main", None, &trusted()));
    }
}
