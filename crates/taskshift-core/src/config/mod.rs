mod loader;
pub mod template;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use crate::log::LogConfig;
pub use loader::{config_dir, config_path, load, logs_dir, try_load};

/// Top-level configuration for TaskShift.
///
/// Loaded from `~/.config/taskshift/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Monitor selection and polling.
    pub engine: EngineConfig,
    /// Diagnostic logging.
    pub logging: LogConfig,
    /// Debug symbol lookup for the taskbar module.
    pub symbols: SymbolsConfig,
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Which non-primary monitor receives the taskbar (1 = first).
    pub secondary_monitor: u32,
    /// Milliseconds between two foreground window checks.
    pub poll_interval_ms: u64,
}

/// Where to find debug symbols for the host's taskbar module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolsConfig {
    /// DbgHelp search path. Empty uses the public Microsoft symbol server
    /// with a cache under the temp directory.
    pub search_path: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            secondary_monitor: 1,
            poll_interval_ms: 2000,
        }
    }
}

impl EngineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    /// Clamps values to safe ranges.
    ///
    /// A zero monitor index would never resolve, and very short poll
    /// intervals would burn CPU next to a running game.
    pub fn validate(&mut self) {
        self.engine.secondary_monitor = self.engine.secondary_monitor.clamp(1, 16);
        self.engine.poll_interval_ms = self.engine.poll_interval_ms.clamp(100, 60_000);
        self.logging.max_file_mb = self.logging.max_file_mb.clamp(1, 1024);
    }
}
