//! Ctrl+C signal handler using `SetConsoleCtrlHandler`.

use std::sync::OnceLock;
use std::sync::mpsc::Sender;

use windows::Win32::System::Console::{CTRL_C_EVENT, SetConsoleCtrlHandler};
use windows::core::BOOL;

/// Written once by `set_handler`, read by the callback.
static SENDER: OnceLock<Sender<()>> = OnceLock::new();

/// Registers a Ctrl+C handler that sends `()` on the given channel.
pub fn set_handler(tx: Sender<()>) -> windows::core::Result<()> {
    if SENDER.set(tx).is_err() {
        return Ok(());
    }
    // SAFETY: the handler is a plain function that lives for the process.
    unsafe { SetConsoleCtrlHandler(Some(handler), true) }
}

unsafe extern "system" fn handler(ctrl_type: u32) -> BOOL {
    if ctrl_type == CTRL_C_EVENT
        && let Some(tx) = SENDER.get()
    {
        let _ = tx.send(());
    }
    BOOL(1)
}
