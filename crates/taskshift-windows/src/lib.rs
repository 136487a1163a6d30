//! Windows implementation of the TaskShift host traits and the explorer
//! mod built on top of them.
#![cfg(windows)]

/// Config file watcher.
pub mod config_watcher;

/// Ctrl+C handling for console tools.
pub mod ctrl_c;

/// Log sink writing to the debugger output.
pub mod debug_output;

/// `Desktop` implementation over Win32.
pub mod desktop;

/// Exported mod entry points.
pub mod entry;

/// Detours over the host's monitor queries.
pub mod hooks;

/// Monitor enumeration and handle conversions.
pub mod monitor;

/// Private symbol lookup via DbgHelp.
pub mod symbols;

/// The primary taskbar window.
pub mod taskbar;

/// Window type wrapping a Win32 `HWND`.
pub mod window;

pub use desktop::Win32Desktop;
pub use hooks::TaskbarHooks;
pub use taskbar::Win32Taskbar;
pub use window::Window;
