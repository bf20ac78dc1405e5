//! Webview permission requests for the main window.
//!
//! Trusted https Steam pages get the notification permission without a
//! prompt. Every other request is denied.
//!
//! - Linux: webkit2gtk `permission-request` signal
//! - Windows: WebView2 `PermissionRequested` event
//! - macOS: WKWebView has no web notification API, nothing to hook

use tauri::{Url, WebviewWindow};

use crate::error::ShellResult;
use crate::links;

#[cfg_attr(not(any(target_os = "linux", windows)), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind {
    Notifications,
    Other,
}

/// Whether a page at `page` may be granted `kind`.
#[cfg_attr(not(any(target_os = "linux", windows)), allow(dead_code))]
pub fn grants(kind: PermissionKind, page: Option<&Url>, trusted: &[String]) -> bool {
    kind == PermissionKind::Notifications
        && page.is_some_and(|url| links::is_trusted_origin(url, trusted))
}

/// Attach the permission handler to the window's webview.
pub fn install(window: &WebviewWindow, trusted: Vec<String>) -> ShellResult<()> {
    window.with_webview(move |webview| platform::attach(webview, trusted))?;
    Ok(())
}

#[cfg(target_os = "linux")]
mod platform {
    use gtk::glib::prelude::*;
    use tauri::webview::PlatformWebview;
    use tauri::Url;
    use webkit2gtk::{NotificationPermissionRequest, PermissionRequestExt, WebViewExt};

    use super::{grants, PermissionKind};

    pub(super) fn attach(webview: PlatformWebview, trusted: Vec<String>) {
        webview.inner().connect_permission_request(move |view, request| {
            let kind = if request.is::<NotificationPermissionRequest>() {
                PermissionKind::Notifications
            } else {
                PermissionKind::Other
            };
            let page = view.uri().and_then(|uri| Url::parse(&uri).ok());

            if grants(kind, page.as_ref(), &trusted) {
                log::info!("[PERMISSIONS] Granting notifications to {:?}", page.as_ref().map(Url::as_str));
                request.allow();
            } else {
                log::debug!("[PERMISSIONS] Denying {:?} request", kind);
                request.deny();
            }
            true
        });
    }
}

#[cfg(windows)]
mod platform {
    use tauri::webview::PlatformWebview;
    use tauri::Url;
    use webview2_com::Microsoft::Web::WebView2::Win32::{
        COREWEBVIEW2_PERMISSION_KIND, COREWEBVIEW2_PERMISSION_KIND_NOTIFICATIONS,
        COREWEBVIEW2_PERMISSION_STATE_ALLOW, COREWEBVIEW2_PERMISSION_STATE_DENY,
    };
    use webview2_com::{take_pwstr, PermissionRequestedEventHandler};
    use windows_core::PWSTR;

    use super::{grants, PermissionKind};

    pub(super) fn attach(webview: PlatformWebview, trusted: Vec<String>) {
        let handler = PermissionRequestedEventHandler::create(Box::new(move |_, args| {
            let Some(args) = args else {
                return Ok(());
            };

            let mut native_kind = COREWEBVIEW2_PERMISSION_KIND::default();
            let mut uri = PWSTR::null();
            unsafe {
                args.PermissionKind(&mut native_kind)?;
                args.Uri(&mut uri)?;
            }

            let kind = if native_kind == COREWEBVIEW2_PERMISSION_KIND_NOTIFICATIONS {
                PermissionKind::Notifications
            } else {
                PermissionKind::Other
            };
            let page = Url::parse(&take_pwstr(uri)).ok();

            let state = if grants(kind, page.as_ref(), &trusted) {
                log::info!("[PERMISSIONS] Granting notifications to {:?}", page.as_ref().map(Url::as_str));
                COREWEBVIEW2_PERMISSION_STATE_ALLOW
            } else {
                log::debug!("[PERMISSIONS] Denying {:?} request", kind);
                COREWEBVIEW2_PERMISSION_STATE_DENY
            };
            unsafe { args.SetState(state) }
        }));

        let mut token = 0i64;
        let attached = unsafe {
            webview
                .controller()
                .CoreWebView2()
                .and_then(|core| core.add_PermissionRequested(&handler, &mut token))
        };
        if let Err(e) = attached {
            log::warn!("[PERMISSIONS] Failed to attach permission handler: {}", e);
        }
    }
}

#[cfg(not(any(target_os = "linux", windows)))]
mod platform {
    use tauri::webview::PlatformWebview;

    pub(super) fn attach(_webview: PlatformWebview, _trusted: Vec<String>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trusted() -> Vec<String> {
        vec!["steamcommunity.com".to_string(), "steampowered.com".to_string()]
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_notifications_granted_to_steam_pages() {
        let chat = url("https://steamcommunity.com/chat/");
        let store = url("https://store.steampowered.com/login/");
        assert!(grants(PermissionKind::Notifications, Some(&chat), &trusted()));
        assert!(grants(PermissionKind::Notifications, Some(&store), &trusted()));
    }

    #[test]
    fn test_notifications_denied_elsewhere() {
        let plain = url("http://steamcommunity.com/chat/");
        let lookalike = url("https://evilsteamcommunity.com/");
        let other = url("https://example.com/");
        assert!(!grants(PermissionKind::Notifications, Some(&plain), &trusted()));
        assert!(!grants(PermissionKind::Notifications, Some(&lookalike), &trusted()));
        assert!(!grants(PermissionKind::Notifications, Some(&other), &trusted()));
        assert!(!grants(PermissionKind::Notifications, None, &trusted()));
    }

    #[test]
    fn test_other_permissions_denied() {
        let chat = url("https://steamcommunity.com/chat/");
        assert!(!grants(PermissionKind::Other, Some(&chat), &trusted()));
    }
}
