//! Native OS notifications via notify-rust.
//!
//! - Linux/BSD: freedesktop D-Bus notifications with Read/Dismiss actions
//! - macOS / Windows: plain notifications (no interaction callback)
//!
//! Nothing here blocks the event thread. The notification server is probed
//! once at startup on a worker thread, and each notification is shown from
//! its own short-lived thread. At most [`MAX_WAITERS`] threads wait for an
//! action at a time; notifications beyond that are shown without a click
//! callback.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tauri::AppHandle;
#[cfg(target_os = "macos")]
use tauri::Manager;

use super::controller::{NativeNotification, Notifier};
use crate::config::APP_NAME;
use crate::error::{ShellError, ShellResult};

/// Action the freedesktop spec reports for a click on the body.
const DEFAULT_ACTION: &str = "default";
const READ_ACTION: &str = "read";
const DISMISS_ACTION: &str = "dismiss";

/// How long the server keeps a notification on screen.
const TIMEOUT_MS: u32 = 10_000;

/// Upper bound on threads blocked in `wait_for_action`.
pub const MAX_WAITERS: usize = 8;

/// Result of the startup probe. Assumed available until the probe says no.
static SERVER_AVAILABLE: AtomicBool = AtomicBool::new(true);

#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
static ACTIVE_WAITERS: AtomicUsize = AtomicUsize::new(0);

/// Whether an invoked action should bring the chat to the front.
#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
pub(crate) fn is_open_action(action: &str) -> bool {
    matches!(action, DEFAULT_ACTION | READ_ACTION)
}

/// Set the notification identity and probe the notification server.
/// Call once at startup.
#[cfg_attr(not(target_os = "macos"), allow(unused_variables))]
pub fn init(app: &AppHandle) {
    #[cfg(target_os = "macos")]
    {
        let bundle_id = app.config().identifier.clone();
        if let Err(e) = notify_rust::set_application(&bundle_id) {
            log::warn!("[NOTIFY] Failed to set application identity {}: {}", bundle_id, e);
        }
    }

    let spawned = std::thread::Builder::new()
        .name("notification-probe".into())
        .spawn(|| {
            let available = probe_server();
            record_probe(available);
            log::info!("[NOTIFY] Native notifications available: {}", available);
        });
    if let Err(e) = spawned {
        log::warn!("[NOTIFY] Failed to spawn notification probe: {}", e);
    }
}

fn record_probe(available: bool) {
    SERVER_AVAILABLE.store(available, Ordering::SeqCst);
}

/// Last probe result. Never touches D-Bus.
fn server_available() -> bool {
    SERVER_AVAILABLE.load(Ordering::SeqCst)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn probe_server() -> bool {
    match notify_rust::get_server_information() {
        Ok(info) => {
            log::debug!("[NOTIFY] Notification server {} {}", info.name, info.version);
            true
        },
        Err(e) => {
            log::warn!("[NOTIFY] No notification server: {}", e);
            false
        },
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn probe_server() -> bool {
    true
}

/// A claimed slot for a thread waiting on a notification action.
#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
#[derive(Debug)]
pub(crate) struct WaiterSlot<'a> {
    active: &'a AtomicUsize,
}

#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
impl<'a> WaiterSlot<'a> {
    /// Claim a slot, or `None` when `max` waiters are already active.
    pub(crate) fn acquire(active: &'a AtomicUsize, max: usize) -> Option<Self> {
        active
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| (n < max).then_some(n + 1))
            .ok()
            .map(|_| Self { active })
    }
}

impl Drop for WaiterSlot<'_> {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Notifier backed by the desktop notification server.
pub struct DesktopNotifier {
    app: AppHandle,
}

impl DesktopNotifier {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl Notifier for DesktopNotifier {
    fn is_supported(&self) -> bool {
        server_available()
    }

    fn show(&self, notification: NativeNotification) {
        let app = self.app.clone();
        // Showing and waiting for an action block on D-Bus, keep it off the
        // event thread.
        let spawned = std::thread::Builder::new()
            .name("native-notification".into())
            .spawn(move || {
                if let Err(e) = deliver(app, notification) {
                    log::warn!("[NOTIFY] {}", e);
                }
            });

        if let Err(e) = spawned {
            log::warn!("[NOTIFY] Failed to spawn notification thread: {}", e);
        }
    }
}

fn build(notification: &NativeNotification) -> notify_rust::Notification {
    let mut native = notify_rust::Notification::new();
    native
        .appname(APP_NAME)
        .summary(&notification.title)
        .body(&notification.body)
        .action(DEFAULT_ACTION, notification.read_label)
        .action(READ_ACTION, notification.read_label)
        .action(DISMISS_ACTION, notification.dismiss_label)
        .timeout(notify_rust::Timeout::Milliseconds(TIMEOUT_MS));

    // Transient notifications skip the history, so the server closes them
    // and the waiting thread returns.
    #[cfg(all(unix, not(target_os = "macos")))]
    native.hint(notify_rust::Hint::Transient(true));

    native
}

#[cfg(all(unix, not(target_os = "macos")))]
fn deliver(app: AppHandle, notification: NativeNotification) -> ShellResult<()> {
    let handle = build(&notification)
        .show()
        .map_err(|e| ShellError::NotificationError(e.to_string()))?;

    let Some(_slot) = WaiterSlot::acquire(&ACTIVE_WAITERS, MAX_WAITERS) else {
        log::debug!("[NOTIFY] {} notifications already waiting, not tracking clicks", MAX_WAITERS);
        return Ok(());
    };

    handle.wait_for_action(move |action| {
        log::debug!("[NOTIFY] Notification action {:?}", action);
        if !is_open_action(action) {
            return;
        }

        let handle = app.clone();
        if let Err(e) = app.run_on_main_thread(move || super::handle_web_notification_click(&handle)) {
            log::warn!("[NOTIFY] Failed to dispatch notification click: {}", e);
        }
    });
    Ok(())
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn deliver(_app: AppHandle, notification: NativeNotification) -> ShellResult<()> {
    build(&notification)
        .show()
        .map(|_| ())
        .map_err(|e| ShellError::NotificationError(e.to_string()))
}
