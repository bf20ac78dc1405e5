//! Central error types for the Steam Chat shell.
//!
//! Host operations are best-effort: most call sites log a `ShellError` and
//! carry on. All errors implement `Serialize` for Tauri IPC compatibility.

use serde::Serialize;
use thiserror::Error;

/// Main error type for shell operations.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Main window could not be created or manipulated
    #[error("Window error: {0}")]
    WindowError(String),

    /// Tray icon could not be built or updated
    #[error("Tray error: {0}")]
    TrayError(String),

    /// Native notification could not be shown
    #[error("Notification error: {0}")]
    NotificationError(String),

    /// Settings could not be read or were invalid
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Log file or directory operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error surfaced by the Tauri runtime
    #[error("Tauri error: {0}")]
    TauriError(#[from] tauri::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Tauri requires command errors to be serializable to send to the webview.
impl Serialize for ShellError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Extension trait for adding context to Results.
///
/// # Example
/// ```ignore
/// use crate::error::{ResultExt, ShellResult};
///
/// fn log_dir(app: &AppHandle) -> ShellResult<PathBuf> {
///     app.path().app_log_dir().context("failed to resolve log directory")
/// }
/// ```
pub trait ResultExt<T> {
    /// Add context to an error, converting it to ShellError::Other.
    fn context(self, msg: &str) -> ShellResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> ShellResult<T> {
        self.map_err(|e| ShellError::Other(format!("{}: {}", msg, e)))
    }
}

/// Type alias for Results using ShellError.
pub type ShellResult<T> = Result<T, ShellError>;
