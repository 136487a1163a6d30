//! Entry points exported to the loader that injects the DLL into explorer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use taskshift_core::config::{self, Config};
use taskshift_core::{Engine, log};
use windows::core::BOOL;

use crate::{TaskbarHooks, Win32Desktop, Win32Taskbar, config_watcher, debug_output};

type ModEngine = Engine<Win32Desktop, Win32Taskbar, TaskbarHooks>;

struct ModState {
    engine: ModEngine,
    watcher_stop: Arc<AtomicBool>,
    watcher: Option<thread::JoinHandle<()>>,
}

static MOD: Mutex<Option<ModState>> = Mutex::new(None);

/// Activates the mod. Returns `FALSE` when activation was refused; the
/// host is then left untouched.
#[unsafe(no_mangle)]
pub extern "system" fn taskshift_init() -> BOOL {
    debug_output::register();
    let config = config::load();
    log::init(&config.logging);
    taskshift_core::log_info!("init");

    let Ok(mut slot) = MOD.lock() else {
        return BOOL(0);
    };
    if slot.is_some() {
        taskshift_core::log_warn!("already initialized");
        return BOOL(1);
    }

    let engine = match Engine::start(
        &config.engine,
        Arc::new(Win32Desktop),
        Arc::new(Win32Taskbar::in_current_process()),
        TaskbarHooks::new(&config.symbols),
    ) {
        Ok(engine) => engine,
        Err(e) => {
            taskshift_core::log_error!("activation refused: {e}");
            return BOOL(0);
        }
    };

    let watcher_stop = Arc::new(AtomicBool::new(false));
    let watcher = spawn_watcher(watcher_stop.clone());

    *slot = Some(ModState {
        engine,
        watcher_stop,
        watcher,
    });
    BOOL(1)
}

/// Deactivates the mod and restores the taskbar.
#[unsafe(no_mangle)]
pub extern "system" fn taskshift_uninit() {
    // Taken out under the lock and stopped after releasing it: the
    // watcher's reload callback locks MOD too.
    let state = match MOD.lock() {
        Ok(mut slot) => slot.take(),
        Err(_) => return,
    };
    let Some(mut state) = state else {
        return;
    };

    taskshift_core::log_info!("uninit");
    state.watcher_stop.store(true, Ordering::Release);
    state.engine.shutdown();
    if let Some(watcher) = state.watcher.take()
        && watcher.join().is_err()
    {
        taskshift_core::log_error!("config watcher panicked");
    }
}

/// Re-reads settings after the host changed them.
#[unsafe(no_mangle)]
pub extern "system" fn taskshift_settings_changed() {
    apply(config::load());
}

fn apply(config: Config) {
    log::init(&config.logging);
    taskshift_core::log_info!("settings changed");

    let Ok(mut slot) = MOD.lock() else {
        return;
    };
    if let Some(state) = slot.as_mut() {
        state.engine.apply_settings(&config.engine);
    }
}

fn spawn_watcher(stop: Arc<AtomicBool>) -> Option<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("taskshift-config-watcher".into())
        .spawn(move || config_watcher::watch(stop, apply))
        .inspect_err(|e| taskshift_core::log_warn!("config watcher not started: {e}"))
        .ok()
}
