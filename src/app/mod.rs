//! Application lifecycle and platform integration.
//!
//! - `window`: main window creation and visibility helpers
//! - `tray`: system tray setup, menu handling and unread indicator
//! - `events`: window and run loop event handlers
//! - `permissions`: webview permission requests

pub mod events;
pub mod permissions;
pub mod tray;
pub mod window;
