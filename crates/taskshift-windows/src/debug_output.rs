//! Log sink writing to the debugger output stream.
//!
//! Inside explorer there is no console; DebugView and attached debuggers
//! read `OutputDebugStringW`.

use windows::Win32::System::Diagnostics::Debug::OutputDebugStringW;
use windows::core::HSTRING;

const PREFIX: &str = "[TaskShift] ";

/// Routes every log line to `OutputDebugStringW` in addition to the file.
pub fn register() {
    taskshift_core::log::set_sink(write);
}

fn write(line: &str) {
    let text = HSTRING::from(format!("{PREFIX}{line}\n"));
    // SAFETY: the string is NUL-terminated and outlives the call.
    unsafe { OutputDebugStringW(&text) };
}
