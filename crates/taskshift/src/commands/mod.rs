pub mod debug;
pub mod doctor;
pub mod init;

/// Exits with an error on platforms without a taskbar to inspect.
#[cfg(not(windows))]
pub fn requires_windows(command: &str) -> ! {
    eprintln!("Error: `{command}` requires Windows.");
    std::process::exit(1);
}
