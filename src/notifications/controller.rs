//! Privileged notification controller.
//!
//! Owns the unread counter and decides what the tray, the main window and
//! the native notification center should do for each bridge signal. The
//! platform pieces are reached through the `WindowControl`, `TrayIndicator`
//! and `Notifier` traits so every operation stays best-effort: a missing
//! window or tray is passed as `None` and skipped.

use serde::{Deserialize, Serialize};

use crate::config::APP_NAME;

/// Label of the native notification action that opens the chat.
pub const READ_LABEL: &str = "Read";

/// Label of the native notification close control.
pub const DISMISS_LABEL: &str = "Dismiss";

/// Number of web notifications the user has not looked at yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnreadCounter(u32);

impl UnreadCounter {
    pub fn get(self) -> u32 {
        self.0
    }

    /// Count one more notification. Saturates instead of wrapping.
    pub fn increment(&mut self) -> u32 {
        self.0 = self.0.saturating_add(1);
        self.0
    }
}

/// State owned by the host and mutated only from the event thread.
#[derive(Debug, Default)]
pub struct HostState {
    pub unread: UnreadCounter,
}

/// Title and body captured from a page's `new Notification(...)` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
}

/// A native notification ready to hand to the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeNotification {
    pub title: String,
    pub body: String,
    pub read_label: &'static str,
    pub dismiss_label: &'static str,
}

impl NativeNotification {
    /// Build from a web payload; an empty title falls back to the app name.
    pub fn from_payload(payload: NotificationPayload) -> Self {
        let title = if payload.title.is_empty() {
            APP_NAME.to_string()
        } else {
            payload.title
        };

        Self {
            title,
            body: payload.body,
            read_label: READ_LABEL,
            dismiss_label: DISMISS_LABEL,
        }
    }
}

/// Visibility operations on the main window.
pub trait WindowControl {
    fn is_visible(&self) -> bool;
    fn show(&self);
    fn is_minimized(&self) -> bool;
    fn unminimize(&self);
    fn focus(&self);
}

/// Tray icon that reflects the unread count.
pub trait TrayIndicator {
    fn show_unread(&self, unread: u32);
}

/// Native notification center.
pub trait Notifier {
    /// Whether the platform can display native notifications right now.
    fn is_supported(&self) -> bool;

    /// Display a notification. Interaction is routed back by the
    /// implementation; failures are logged, never returned.
    fn show(&self, notification: NativeNotification);
}

/// Tray tooltip for the given unread count.
pub fn tray_tooltip(unread: u32) -> String {
    if unread > 0 {
        format!("{} ({} unread)", APP_NAME, unread)
    } else {
        APP_NAME.to_string()
    }
}

/// Replace the unread count and refresh the tray.
pub fn set_unread(state: &mut HostState, tray: Option<&dyn TrayIndicator>, count: u32) {
    state.unread = UnreadCounter(count);
    if let Some(tray) = tray {
        tray.show_unread(count);
    }
}

/// Bring the main window to the front: show, unminimize, focus.
pub fn focus_window(window: &dyn WindowControl) {
    if !window.is_visible() {
        window.show();
    }
    if window.is_minimized() {
        window.unminimize();
    }
    window.focus();
}

/// `notification-from-web`: count it, update the tray, render it natively.
///
/// `notifier` is `None` when native notifications are turned off. The
/// counter is incremented even when nothing can be rendered.
pub fn on_web_notification(
    state: &mut HostState,
    tray: Option<&dyn TrayIndicator>,
    notifier: Option<&dyn Notifier>,
    payload: NotificationPayload,
) -> u32 {
    let unread = state.unread.increment();
    if let Some(tray) = tray {
        tray.show_unread(unread);
    }

    match notifier {
        Some(notifier) if notifier.is_supported() => {
            notifier.show(NativeNotification::from_payload(payload));
        },
        Some(_) => log::debug!("[NOTIFY] Native notifications unsupported, skipping render"),
        None => log::debug!("[NOTIFY] Native notifications disabled, skipping render"),
    }

    unread
}

/// `notification-click` and native notification interaction: focus the
/// window and clear the unread count.
pub fn on_web_notification_click(
    state: &mut HostState,
    window: Option<&dyn WindowControl>,
    tray: Option<&dyn TrayIndicator>,
) {
    if let Some(window) = window {
        focus_window(window);
    }
    log::debug!("[NOTIFY] Clearing {} unread", state.unread.get());
    set_unread(state, tray, 0);
}

/// The user is looking at the window, so everything counts as read.
pub fn on_window_focused(state: &mut HostState, tray: Option<&dyn TrayIndicator>) {
    set_unread(state, tray, 0);
}
