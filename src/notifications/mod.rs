//! Host side of the notification bridge.
//!
//! ## Architecture
//!
//! ```text
//! notifications/
//!   mod.rs        - Tauri glue: resolves state, tray, window and notifier
//!   controller.rs - Unread counter and the signal handlers
//!   native.rs     - notify-rust backed notifier
//! ```
//!
//! Every entry point here runs on the main event thread, so the host state
//! mutex is never contended.

pub mod controller;
pub mod native;


pub use controller::{HostState, NotificationPayload, TrayIndicator, WindowControl};

use parking_lot::Mutex;
use tauri::{AppHandle, Manager};

use crate::app::{tray, window};
use crate::config;
use controller::Notifier;
use native::DesktopNotifier;

/// Host state as managed by the Tauri app.
pub type SharedHostState = Mutex<HostState>;

/// Handle `notification-from-web`.
pub fn handle_web_notification(app: &AppHandle, payload: NotificationPayload) {
    let Some(state) = app.try_state::<SharedHostState>() else {
        log::warn!("[NOTIFY] Host state not ready, dropping notification");
        return;
    };

    let tray = app.tray_by_id(tray::TRAY_ID);
    let notifier = DesktopNotifier::new(app.clone());
    let notifier = config::native_notifications_enabled().then_some(&notifier as &dyn Notifier);

    let unread = controller::on_web_notification(
        &mut state.lock(),
        tray.as_ref().map(|t| t as &dyn TrayIndicator),
        notifier,
        payload,
    );
    log::debug!("[NOTIFY] Web notification received, {} unread", unread);
}

/// Handle `notification-click` and clicks on the native notification.
pub fn handle_web_notification_click(app: &AppHandle) {
    let Some(state) = app.try_state::<SharedHostState>() else {
        return;
    };

    let tray = app.tray_by_id(tray::TRAY_ID);
    let main = app.get_webview_window(window::MAIN_WINDOW_LABEL);

    controller::on_web_notification_click(
        &mut state.lock(),
        main.as_ref().map(|w| w as &dyn WindowControl),
        tray.as_ref().map(|t| t as &dyn TrayIndicator),
    );
}

/// Handle the main window gaining focus.
pub fn handle_window_focused(app: &AppHandle) {
    let Some(state) = app.try_state::<SharedHostState>() else {
        return;
    };

    let tray = app.tray_by_id(tray::TRAY_ID);
    controller::on_window_focused(
        &mut state.lock(),
        tray.as_ref().map(|t| t as &dyn TrayIndicator),
    );
}
