//! Application configuration management.
//!
//! User preferences live in a single typed struct behind a
//! `parking_lot::RwLock`, loaded once at startup from the settings store.

pub mod app;

pub use app::{
    is_close_to_tray, load_from_store, native_notifications_enabled, APP_CONFIG, APP_NAME,
};
