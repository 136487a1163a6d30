use clap::Args;

#[derive(Args)]
pub struct ProbeArgs {
    /// Seconds to wait before sampling, to allow switching to the app
    #[arg(long, default_value_t = 3)]
    pub delay: u64,
}

/// Classifies the foreground window after `delay` seconds.
#[cfg(windows)]
pub fn execute(args: &ProbeArgs) {
    use std::thread;
    use std::time::Duration;

    use taskshift_core::{Desktop, MonitorRegistry, Taskbar, classify, config};
    use taskshift_windows::{Win32Desktop, Win32Taskbar, Window};

    println!("Sampling the foreground window in {}s...", args.delay);
    thread::sleep(Duration::from_secs(args.delay));

    let desktop = Win32Desktop;
    let registry = MonitorRegistry::new();
    registry.refresh(&desktop, config::load().engine.secondary_monitor);
    let taskbar = Win32Taskbar::in_any_process().window();

    let foreground = desktop.foreground_window();
    let verdict = classify(&desktop, &registry, taskbar, foreground);

    if let Some(id) = foreground {
        let window = Window::from_id(id);
        println!("Window:  {id} \"{}\" [{}]", window.title(), window.class());
        match window.rect() {
            Some(r) => println!("Bounds:  {}x{} at ({}, {})", r.width, r.height, r.x, r.y),
            None => println!("Bounds:  unavailable"),
        }
    }
    println!("Verdict: {}", verdict.describe());
    println!(
        "The taskbar {} move.",
        if verdict.is_fullscreen() { "would" } else { "would not" }
    );
}

#[cfg(not(windows))]
pub fn execute(_args: &ProbeArgs) {
    super::super::requires_windows("debug probe");
}
