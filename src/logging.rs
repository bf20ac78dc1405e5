//! Logging for the Steam Chat shell.
//!
//! Every `log` record accepted by the `RUST_LOG` filter (default `info`) goes
//! to the console through env_logger and is appended to a daily file in the
//! app log directory, with size-based rotation and cleanup.

use chrono::{Local, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tauri::{AppHandle, Manager};

use crate::error::{ResultExt, ShellResult};

/// Maximum log file size before rotation (5MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of log files to keep
const MAX_LOG_FILES: usize = 5;

const LOG_PREFIX: &str = "steam-chat";

/// Path of the log file for a given day.
fn log_path_for(log_dir: &Path, date: NaiveDate) -> PathBuf {
    log_dir.join(format!("{}_{}.log", LOG_PREFIX, date.format("%Y-%m-%d")))
}

/// Path a full log file is renamed to when rotated.
fn rotated_path_for(log_dir: &Path, at: NaiveDateTime) -> PathBuf {
    log_dir.join(format!("{}_{}.log", LOG_PREFIX, at.format("%Y-%m-%d_%H%M%S")))
}

fn format_line(at: NaiveDateTime, level: log::Level, target: &str, message: &str) -> String {
    format!(
        "[{}] [{}] [{}] {}\n",
        at.format("%Y-%m-%d %H:%M:%S%.3f"),
        level,
        target,
        message
    )
}

/// Clean up old log files, keeping only the most recent MAX_LOG_FILES
fn cleanup_old_logs(log_dir: &Path) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "log"))
        .collect();

    // Newest first
    log_files.sort_by(|a, b| {
        let a_time = a.metadata().and_then(|m| m.modified()).ok();
        let b_time = b.metadata().and_then(|m| m.modified()).ok();
        b_time.cmp(&a_time)
    });

    for file in log_files.into_iter().skip(MAX_LOG_FILES) {
        let _ = fs::remove_file(file.path());
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// The file currently being appended to.
///
/// Nothing in here may log: it runs inside the logger.
struct LogFile {
    dir: PathBuf,
    path: PathBuf,
    file: Option<File>,
}

impl LogFile {
    fn open(dir: PathBuf) -> ShellResult<Self> {
        fs::create_dir_all(&dir)?;
        let path = log_path_for(&dir, Local::now().date_naive());
        let file = open_append(&path)?;
        cleanup_old_logs(&dir);

        Ok(Self {
            dir,
            path,
            file: Some(file),
        })
    }

    fn write_line(&mut self, line: &str) {
        self.roll_over_day();
        if let Some(file) = self.file.as_mut() {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
        self.rotate_if_full();
    }

    /// Switch to a new file when the date changes.
    fn roll_over_day(&mut self) {
        let today = log_path_for(&self.dir, Local::now().date_naive());
        if today != self.path {
            self.file = open_append(&today).ok();
            self.path = today;
            cleanup_old_logs(&self.dir);
        }
    }

    fn rotate_if_full(&mut self) {
        let too_big = fs::metadata(&self.path).is_ok_and(|m| m.len() > MAX_LOG_SIZE);
        if !too_big {
            return;
        }

        let rotated = rotated_path_for(&self.dir, Local::now().naive_local());
        self.file = None;
        let _ = fs::rename(&self.path, &rotated);
        self.file = open_append(&self.path).ok();
        cleanup_old_logs(&self.dir);
    }

    fn flush(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
    }
}

/// Console logger plus the daily log file.
struct HostLogger {
    console: env_logger::Logger,
    file: Mutex<LogFile>,
}

impl log::Log for HostLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.console.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.console.matches(record) {
            return;
        }

        self.console.log(record);
        let line = format_line(
            Local::now().naive_local(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        self.file.lock().write_line(&line);
    }

    fn flush(&self) {
        self.console.flush();
        self.file.lock().flush();
    }
}

/// Initialize the logging system
pub fn init_logging(app: &AppHandle) -> ShellResult<()> {
    let log_dir = app.path().app_log_dir()?;
    let file = LogFile::open(log_dir.clone())?;

    let console =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .build();
    let max_level = console.filter();

    log::set_boxed_logger(Box::new(HostLogger {
        console,
        file: Mutex::new(file),
    }))
    .context("Failed to install logger")?;
    log::set_max_level(max_level);

    log::info!("Logging system initialized");
    log::info!("Log directory: {:?}", log_dir);
    Ok(())
}
