use taskshift_core::config::{self, Config};

/// ANSI escape helpers for doctor output.
const OK: &str = "\x1b[32m[ok]\x1b[0m";
const WARN: &str = "\x1b[33m[warn]\x1b[0m";
const FAIL: &str = "\x1b[31m[fail]\x1b[0m";
const FIXED: &str = "\x1b[36m[fixed]\x1b[0m";

pub fn execute() {
    println!();
    check_config_dir();
    let config = check_config_file();
    platform::check_monitors(&config);
    platform::check_taskbar();
    println!();
}

fn check_config_dir() {
    match config::config_dir() {
        Some(dir) if dir.is_dir() => {
            println!("  {OK} Config directory exists ({})", dir.display());
        }
        Some(dir) => match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                println!("  {FIXED} Created config directory ({})", dir.display());
            }
            Err(e) => {
                println!("  {FAIL} Config directory missing and could not create it: {e}");
            }
        },
        None => {
            println!("  {FAIL} Could not determine home directory");
        }
    }
}

/// Reports on `config.toml` and returns the settings the mod would use.
fn check_config_file() -> Config {
    let Some(path) = config::config_path() else {
        println!("  {FAIL} Could not determine config path");
        return Config::default();
    };
    if !path.exists() {
        println!("  {WARN} config.toml not found (using defaults)");
        return Config::default();
    }
    match config::try_load() {
        Ok(config) => {
            println!(
                "  {OK} config.toml is valid (secondary monitor #{}, poll every {} ms)",
                config.engine.secondary_monitor, config.engine.poll_interval_ms
            );
            config
        }
        Err(e) => {
            println!("  {FAIL} config.toml: {e}");
            Config::default()
        }
    }
}

#[cfg(windows)]
mod platform {
    use taskshift_core::{Config, MonitorRegistry, Taskbar};
    use taskshift_windows::{Win32Desktop, Win32Taskbar};

    use super::{FAIL, OK, WARN};

    pub fn check_monitors(config: &Config) {
        let monitors = match taskshift_windows::monitor::enumerate_monitors() {
            Ok(monitors) => monitors,
            Err(e) => {
                println!("  {FAIL} Could not enumerate monitors: {e}");
                return;
            }
        };

        match monitors.len() {
            0 => println!("  {FAIL} No monitors detected"),
            1 => println!("  {FAIL} Only one monitor detected, at least two are needed"),
            n => println!("  {OK} {n} monitors detected"),
        }

        let index = config.engine.secondary_monitor;
        let registry = MonitorRegistry::new();
        if registry.refresh(&Win32Desktop, index) {
            let device = registry
                .secondary()
                .and_then(|id| monitors.iter().find(|m| m.id == id))
                .map(|m| m.device.clone())
                .unwrap_or_default();
            println!("  {OK} Secondary monitor #{index} resolves to {device}");
        } else if monitors.len() > 1 {
            println!(
                "  {WARN} Secondary monitor #{index} not found ({} non-primary monitor(s))",
                monitors.len() - 1
            );
        }
    }

    pub fn check_taskbar() {
        match Win32Taskbar::in_any_process().window() {
            Some(id) => println!("  {OK} Taskbar window found ({id})"),
            None => println!("  {FAIL} Taskbar window (Shell_TrayWnd) not found"),
        }
    }
}

#[cfg(not(windows))]
mod platform {
    use taskshift_core::Config;

    use super::WARN;

    pub fn check_monitors(_config: &Config) {
        println!("  {WARN} Monitor checks require Windows");
    }

    pub fn check_taskbar() {
        println!("  {WARN} Taskbar checks require Windows");
    }
}
