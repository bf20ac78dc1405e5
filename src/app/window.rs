//! Main window: the embedded Steam chat.

use std::sync::atomic::{AtomicBool, Ordering};

use tauri::webview::{NewWindowResponse, PageLoadEvent};
use tauri::{AppHandle, Manager, Runtime, Url, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use super::permissions;
use crate::bridge::Bridge;
use crate::config::{APP_CONFIG, APP_NAME};
use crate::error::{ShellError, ShellResult};
use crate::links::{self, LinkTarget};
use crate::notifications::{controller, WindowControl};

/// Main window label. The relay only accepts messages from this webview.
pub const MAIN_WINDOW_LABEL: &str = "main";

/// Set once the user picks Quit, so closing is no longer turned into hiding.
static QUITTING: AtomicBool = AtomicBool::new(false);

/// Set after the first page load has revealed the window.
static REVEALED: AtomicBool = AtomicBool::new(false);

pub fn is_quitting() -> bool {
    QUITTING.load(Ordering::SeqCst)
}

/// Quit for real instead of hiding to the tray.
pub fn request_quit<R: Runtime>(app: &AppHandle<R>) {
    QUITTING.store(true, Ordering::SeqCst);
    app.exit(0);
}

/// Build the hidden main window. It is shown when the first page finishes
/// loading.
pub fn create_main_window(app: &AppHandle, bridge: &Bridge) -> ShellResult<WebviewWindow> {
    let config = APP_CONFIG.read().clone();
    let start_url = Url::parse(&config.start_url).map_err(|e| {
        ShellError::ConfigError(format!("invalid start URL {:?}: {}", config.start_url, e))
    })?;

    let nav_app = app.clone();
    let nav_hosts = config.trusted_hosts.clone();
    let popup_app = app.clone();
    let popup_hosts = config.trusted_hosts.clone();
    let load_hosts = config.trusted_hosts.clone();
    let script = bridge.script();

    REVEALED.store(false, Ordering::SeqCst);

    let window = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::External(start_url))
        .title(APP_NAME)
        .inner_size(1200.0, 800.0)
        .min_inner_size(800.0, 600.0)
        .visible(false)
        .user_agent(&config.user_agent)
        .initialization_script(&script)
        .on_navigation(move |url| match links::link_target(url, &nav_hosts) {
            LinkTarget::InApp | LinkTarget::NonWeb => true,
            LinkTarget::Browser => {
                links::open_external(&nav_app, url);
                false
            },
        })
        // target=_blank links, including Steam's linkfilter redirects.
        .on_new_window(move |url, _features| {
            let url = links::unwrap_linkfilter(&url, &popup_hosts);
            match links::link_target(&url, &popup_hosts) {
                LinkTarget::InApp => NewWindowResponse::Allow,
                LinkTarget::Browser => {
                    links::open_external(&popup_app, &url);
                    NewWindowResponse::Deny
                },
                LinkTarget::NonWeb => NewWindowResponse::Deny,
            }
        })
        .on_page_load(move |window, payload| {
            if !matches!(payload.event(), PageLoadEvent::Finished) {
                return;
            }
            links::save_last_url(payload.url(), &load_hosts);
            if !REVEALED.swap(true, Ordering::SeqCst) {
                if let Err(e) = window.show() {
                    log::warn!("[WINDOW] Failed to show main window: {}", e);
                }
            }
        })
        .build()
        .map_err(|e| ShellError::WindowError(format!("failed to create main window: {}", e)))?;

    if let Err(e) = permissions::install(&window, config.trusted_hosts) {
        log::warn!("[WINDOW] Failed to install permission handler: {}", e);
    }

    log::info!("[WINDOW] Main window created");
    Ok(window)
}

/// Bring the main window to the front, recreating it if it was closed.
pub fn show_main(app: &AppHandle) {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        controller::focus_window(&window);
        return;
    }

    let Some(bridge) = app.try_state::<Bridge>() else {
        return;
    };
    if let Err(e) = create_main_window(app, bridge.inner()) {
        log::error!("[WINDOW] Failed to recreate main window: {}", e);
    }
}

/// Tray click: hide a visible window, otherwise bring it back.
pub fn toggle_main(app: &AppHandle) {
    match app.get_webview_window(MAIN_WINDOW_LABEL) {
        Some(window) if WindowControl::is_visible(&window) => hide_main(app),
        _ => show_main(app),
    }
}

pub fn hide_main(app: &AppHandle) {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        if let Err(e) = window.hide() {
            log::warn!("[WINDOW] Failed to hide main window: {}", e);
        }
    }
}

pub fn reload_main(app: &AppHandle) {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
        if let Err(e) = window.reload() {
            log::warn!("[WINDOW] Failed to reload main window: {}", e);
        }
    }
}

impl<R: Runtime> WindowControl for WebviewWindow<R> {
    fn is_visible(&self) -> bool {
        WebviewWindow::is_visible(self).unwrap_or(false)
    }

    fn show(&self) {
        if let Err(e) = WebviewWindow::show(self) {
            log::warn!("[WINDOW] show failed: {}", e);
        }
    }

    fn is_minimized(&self) -> bool {
        WebviewWindow::is_minimized(self).unwrap_or(false)
    }

    fn unminimize(&self) {
        if let Err(e) = WebviewWindow::unminimize(self) {
            log::warn!("[WINDOW] unminimize failed: {}", e);
        }
    }

    fn focus(&self) {
        if let Err(e) = self.set_focus() {
            log::warn!("[WINDOW] set_focus failed: {}", e);
        }
    }
}
