//! Window and run loop event handlers.

use tauri::{AppHandle, Manager, RunEvent, Window, WindowEvent};

use super::window::{self, MAIN_WINDOW_LABEL};
use crate::config;
use crate::notifications;

/// Handle window events for the application.
///
/// This is called from the Tauri builder's `on_window_event` hook.
pub fn handle_window_event(window: &Window, event: &WindowEvent) {
    if window.label() != MAIN_WINDOW_LABEL {
        return;
    }

    match event {
        // Hide to tray instead of closing (if enabled)
        WindowEvent::CloseRequested { api, .. } => {
            if !window::is_quitting() && config::is_close_to_tray() {
                api.prevent_close();
                if let Err(e) = window.hide() {
                    log::warn!("[WINDOW] Failed to hide on close: {}", e);
                }
            }
        },

        // Whatever arrived while away has now been seen.
        WindowEvent::Focused(true) => notifications::handle_window_focused(window.app_handle()),

        _ => {},
    }
}

/// Handle run loop events.
///
/// Closing the last window keeps the app alive in the tray; only Quit exits.
#[cfg_attr(not(target_os = "macos"), allow(unused_variables))]
pub fn handle_run_event(app: &AppHandle, event: RunEvent) {
    match event {
        RunEvent::ExitRequested { code: None, api, .. } if !window::is_quitting() => {
            api.prevent_exit();
        },

        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => window::show_main(app),

        _ => {},
    }
}
