//! Runs the tracker against the live desktop without installing any
//! interception. Taskbar refreshes are printed instead of sent.

/// Watches for fullscreen apps until Ctrl+C.
#[cfg(windows)]
pub fn execute() {
    use std::sync::Arc;
    use std::sync::mpsc;

    use taskshift_core::config::{self, LogConfig};
    use taskshift_core::{Engine, NoInterception, log};
    use taskshift_windows::Win32Desktop;

    let config = config::load();

    log::set_sink(|line| println!("{line}"));
    log::init(&LogConfig {
        enabled: true,
        level: "debug".into(),
        max_file_mb: config.logging.max_file_mb,
    });

    let mut engine = match Engine::start(
        &config.engine,
        Arc::new(Win32Desktop),
        Arc::new(DryRunTaskbar::new()),
        NoInterception,
    ) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "Watching for fullscreen apps every {} ms (press Ctrl+C to stop)...\n",
        config.engine.poll_interval_ms
    );

    let (stop_tx, stop_rx) = mpsc::channel();
    if let Err(e) = taskshift_windows::ctrl_c::set_handler(stop_tx) {
        eprintln!("Error: could not set Ctrl+C handler: {e}");
        engine.shutdown();
        std::process::exit(1);
    }
    let _ = stop_rx.recv();

    engine.shutdown();
}

#[cfg(not(windows))]
pub fn execute() {
    super::super::requires_windows("debug watch");
}

/// The real taskbar window, with refreshes reported instead of sent.
#[cfg(windows)]
struct DryRunTaskbar {
    inner: taskshift_windows::Win32Taskbar,
}

#[cfg(windows)]
impl DryRunTaskbar {
    fn new() -> Self {
        Self {
            inner: taskshift_windows::Win32Taskbar::in_any_process(),
        }
    }
}

#[cfg(windows)]
impl taskshift_core::Taskbar for DryRunTaskbar {
    fn window(&self) -> Option<taskshift_core::WindowId> {
        self.inner.window()
    }

    fn refresh(&self) {
        println!("(dry run) taskbar refresh requested");
    }
}
