//! System tray: icon, unread indicator and menu.

use tauri::{
    image::Image,
    menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent},
    App, AppHandle, Runtime,
};

use super::window;
use crate::config::APP_NAME;
use crate::error::{ShellError, ShellResult};
use crate::notifications::controller::tray_tooltip;
use crate::notifications::TrayIndicator;

/// Id used to look the tray up from the notification controller.
pub const TRAY_ID: &str = "main-tray";

const ICON: &[u8] = include_bytes!("../../icons/icon.png");
const UNREAD_ICON: &[u8] = include_bytes!("../../icons/icon-unread.png");

fn icon_for(unread: u32) -> &'static [u8] {
    if unread > 0 {
        UNREAD_ICON
    } else {
        ICON
    }
}

fn setup_system_tray(app: &App) -> tauri::Result<TrayIcon> {
    let show = MenuItem::with_id(app, "show", "Show", true, None::<&str>)?;
    let hide = MenuItem::with_id(app, "hide", "Hide", true, None::<&str>)?;
    let reload = MenuItem::with_id(app, "reload", "Reload", true, None::<&str>)?;
    let quit = MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?;
    let separator = PredefinedMenuItem::separator(app)?;

    let menu = Menu::with_items(
        app,
        &[&show, &hide, &separator, &reload, &separator, &quit],
    )?;

    TrayIconBuilder::with_id(TRAY_ID)
        .icon(Image::from_bytes(ICON)?)
        .tooltip(APP_NAME)
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(handle_menu_event)
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                window::toggle_main(tray.app_handle());
            }
        })
        .build(app)
}

fn handle_menu_event(app: &AppHandle, event: MenuEvent) {
    match event.id.as_ref() {
        "show" => window::show_main(app),
        "hide" => window::hide_main(app),
        "reload" => window::reload_main(app),
        "quit" => window::request_quit(app),
        _ => {},
    }
}

/// Swap icon and tooltip to reflect the unread count.
fn update_unread<R: Runtime>(tray: &TrayIcon<R>, unread: u32) -> ShellResult<()> {
    let icon = Image::from_bytes(icon_for(unread))
        .map_err(|e| ShellError::TrayError(format!("failed to decode icon: {}", e)))?;
    tray.set_icon(Some(icon))
        .map_err(|e| ShellError::TrayError(format!("failed to set icon: {}", e)))?;
    tray.set_tooltip(Some(tray_tooltip(unread)))
        .map_err(|e| ShellError::TrayError(format!("failed to set tooltip: {}", e)))?;
    Ok(())
}

impl<R: Runtime> TrayIndicator for TrayIcon<R> {
    fn show_unread(&self, unread: u32) {
        if let Err(e) = update_unread(self, unread) {
            log::warn!("[TRAY] {}", e);
        }
    }
}

/// Initialize the system tray.
///
/// This is called from the app setup hook.
pub fn init(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    let tray = setup_system_tray(app)?;
    tray.show_unread(0);
    Ok(())
}
