//! Watches `config.toml` and hands validated reloads to a callback.
//!
//! Uses `FindFirstChangeNotificationW` on the config directory. A change
//! notification is confirmed by comparing the file's mtime, and invalid
//! files are logged and skipped so the running settings stay in force.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use windows::Win32::Foundation::WAIT_OBJECT_0;
use windows::Win32::Storage::FileSystem::{
    FILE_NOTIFY_CHANGE_FILE_NAME, FILE_NOTIFY_CHANGE_LAST_WRITE, FindCloseChangeNotification,
    FindFirstChangeNotificationW, FindNextChangeNotification,
};
use windows::Win32::System::Threading::WaitForSingleObject;
use windows::core::HSTRING;

use taskshift_core::config::{self, Config};

/// Timeout between stop-flag checks when no changes occur (ms).
const WAIT_TIMEOUT_MS: u32 = 1000;

/// Runs the watcher loop until `stop` is set.
pub fn watch(stop: Arc<AtomicBool>, on_reload: impl Fn(Config)) {
    let (Some(dir), Some(path)) = (config::config_dir(), config::config_path()) else {
        taskshift_core::log_info!("config dir not found, watcher exiting");
        return;
    };
    if !dir.exists() {
        taskshift_core::log_info!("{} does not exist, watcher exiting", dir.display());
        return;
    }

    let mut last = mtime(&path);
    let dir_str = HSTRING::from(dir.as_os_str());
    let flags = FILE_NOTIFY_CHANGE_LAST_WRITE | FILE_NOTIFY_CHANGE_FILE_NAME;

    // SAFETY: the directory string outlives the call.
    let Ok(handle) = (unsafe { FindFirstChangeNotificationW(&dir_str, false, flags) }) else {
        taskshift_core::log_warn!("FindFirstChangeNotificationW failed, watcher exiting");
        return;
    };

    while !stop.load(Ordering::Acquire) {
        // SAFETY: handle stays open until the loop exits.
        let result = unsafe { WaitForSingleObject(handle, WAIT_TIMEOUT_MS) };
        if stop.load(Ordering::Acquire) {
            break;
        }
        if result != WAIT_OBJECT_0 {
            continue;
        }

        let current = mtime(&path);
        if current != last {
            last = current;
            match config::try_load() {
                Ok(cfg) => {
                    taskshift_core::log_info!("config.toml changed, reloading");
                    on_reload(cfg);
                }
                Err(e) => taskshift_core::log_warn!("config.toml invalid, skipping: {e}"),
            }
        }

        // SAFETY: re-arms the notification handle opened above.
        let _ = unsafe { FindNextChangeNotification(handle) };
    }

    // SAFETY: closes the handle opened above exactly once.
    let _ = unsafe { FindCloseChangeNotification(handle) };
}

fn mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().ok().and_then(|m| m.modified().ok())
}
