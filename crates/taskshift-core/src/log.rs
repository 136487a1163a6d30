//! Logger with a size-rotated file and an optional line sink.
//!
//! Logs are written to `~/.config/taskshift/logs/taskshift.log`. When
//! the file exceeds the configured max size, it is rotated to
//! `taskshift.log.1` (one backup kept). A platform crate may register a
//! sink that receives every formatted line as well (e.g. the debugger
//! output on Windows).
//!
//! Logging can be turned on and off at runtime by calling [`init`] again.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

use serde::{Deserialize, Serialize};

static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);
static ENABLED: AtomicBool = AtomicBool::new(false);
static SINK: OnceLock<fn(&str)> = OnceLock::new();

const LOG_FILE_NAME: &str = "taskshift.log";
const BACKUP_NAME: &str = "taskshift.log.1";

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum log level: "debug", "info", "warn", or "error".
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_file_mb: 10,
        }
    }
}

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Self::Debug,
            "warn" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

struct Logger {
    file: Option<File>,
    path: PathBuf,
    min_level: Level,
    max_bytes: u64,
    written: u64,
}

/// Registers a sink that receives every formatted log line.
///
/// Only the first registration takes effect.
pub fn set_sink(sink: fn(&str)) {
    let _ = SINK.set(sink);
}

/// Returns whether logging is on. A single atomic load, so callers can
/// skip building expensive messages.
pub fn enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// (Re)initialises the global logger.
///
/// Disables logging when `config.enabled` is `false`. If the log file
/// cannot be opened, lines still reach the sink.
pub fn init(config: &LogConfig) {
    let logger = config.enabled.then(|| {
        let path = crate::config::logs_dir()
            .map(|dir| dir.join(LOG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME));
        Logger::open(path, config)
    });

    let Ok(mut slot) = LOGGER.lock() else {
        return;
    };
    ENABLED.store(logger.is_some(), Ordering::Relaxed);
    *slot = logger;
}

/// Writes a log line if the level is at or above the configured minimum.
pub fn write(level: Level, args: fmt::Arguments<'_>) {
    if !enabled() {
        return;
    }
    let Ok(mut slot) = LOGGER.lock() else {
        return;
    };
    let Some(logger) = slot.as_mut() else {
        return;
    };
    if level < logger.min_level {
        return;
    }

    let line = format!("[{lvl}] {args}", lvl = level.as_str());
    if let Some(sink) = SINK.get() {
        sink(&line);
    }
    logger.append(&format!("{} {line}\n", timestamp()));
}

impl Logger {
    fn open(path: PathBuf, config: &LogConfig) -> Self {
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        let file = open_append(&path);
        let written = file
            .as_ref()
            .and_then(|f| f.metadata().ok())
            .map_or(0, |m| m.len());

        Self {
            file,
            path,
            min_level: Level::parse(&config.level),
            max_bytes: config.max_file_mb * 1024 * 1024,
            written,
        }
    }

    fn append(&mut self, line: &str) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        let _ = file.write_all(line.as_bytes());
        self.written += line.len() as u64;

        if self.max_bytes > 0 && self.written >= self.max_bytes {
            self.rotate();
        }
    }

    fn rotate(&mut self) {
        let backup = self.path.with_file_name(BACKUP_NAME);
        // Close the current file before renaming it.
        self.file = None;
        let _ = fs::rename(&self.path, &backup);
        self.file = open_append(&self.path);
        self.written = 0;
    }
}

fn open_append(path: &Path) -> Option<File> {
    OpenOptions::new().create(true).append(true).open(path).ok()
}

fn timestamp() -> String {
    // Use std::time for a simple UTC timestamp. No chrono dependency.
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = dur.as_secs();
    let (h, m, s) = (secs / 3600 % 24, secs / 60 % 60, secs % 60);
    format!("{h:02}:{m:02}:{s:02}.{:03}", dur.subsec_millis())
}

/// Logs at DEBUG level.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Debug, format_args!($($arg)*)) };
}

/// Logs at INFO level.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Info, format_args!($($arg)*)) };
}

/// Logs at WARN level.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Warn, format_args!($($arg)*)) };
}

/// Logs at ERROR level.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Error, format_args!($($arg)*)) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parse_defaults_to_info() {
        // Act / Assert
        assert_eq!(Level::parse("DEBUG"), Level::Debug);
        assert_eq!(Level::parse("warn"), Level::Warn);
        assert_eq!(Level::parse("error"), Level::Error);
        assert_eq!(Level::parse("verbose"), Level::Info);
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        // Act / Assert
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn rotation_keeps_one_backup() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("taskshift-log-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let config = LogConfig {
            enabled: true,
            level: "debug".into(),
            max_file_mb: 1,
        };
        let mut logger = Logger::open(dir.join(LOG_FILE_NAME), &config);
        logger.max_bytes = 64;

        // Act
        logger.append(&"x".repeat(80));
        logger.append("after rotation\n");

        // Assert
        assert!(dir.join(BACKUP_NAME).exists());
        let current = fs::read_to_string(dir.join(LOG_FILE_NAME)).unwrap();
        assert_eq!(current, "after rotation\n");
        let _ = fs::remove_dir_all(&dir);
    }
}
