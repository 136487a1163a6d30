use std::sync::atomic::{AtomicUsize, Ordering};

use taskshift_core::{Taskbar, WindowId};
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentProcessId;
use windows::Win32::UI::WindowsAndMessaging::{FindWindowW, SendMessageW};
use windows::core::{PCWSTR, w};

use crate::window::Window;

/// Window class of the primary taskbar.
pub const TASKBAR_CLASS_NAME: PCWSTR = w!("Shell_TrayWnd");

/// Private message that makes the taskbar re-run its display-change
/// handling (`CTray::_HandleDisplayChange`). Undocumented.
const WM_TRAY_HANDLE_DISPLAY_CHANGE: u32 = 0x5B8;

/// Which process the taskbar must belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    /// The hosting explorer process; used by the mod.
    CurrentProcess,
    /// Any process; used by diagnostics running outside explorer.
    AnyProcess,
}

/// The primary taskbar window, located lazily and cached.
#[derive(Debug)]
pub struct Win32Taskbar {
    hwnd: AtomicUsize,
    owner: Owner,
}

impl Win32Taskbar {
    /// The taskbar of the process this code runs in.
    pub fn in_current_process() -> Self {
        Self {
            hwnd: AtomicUsize::new(0),
            owner: Owner::CurrentProcess,
        }
    }

    /// The taskbar of whichever explorer owns it.
    pub fn in_any_process() -> Self {
        Self {
            hwnd: AtomicUsize::new(0),
            owner: Owner::AnyProcess,
        }
    }

    fn locate(&self) -> Option<Window> {
        // SAFETY: FindWindowW only reads the class name string.
        let hwnd = unsafe { FindWindowW(TASKBAR_CLASS_NAME, PCWSTR::null()) }.ok()?;
        let window = Window::new(hwnd);
        if window.id().is_none() {
            return None;
        }
        // SAFETY: GetCurrentProcessId has no preconditions.
        if self.owner == Owner::CurrentProcess && window.process_id() != unsafe { GetCurrentProcessId() } {
            return None;
        }
        Some(window)
    }
}

impl Taskbar for Win32Taskbar {
    fn window(&self) -> Option<WindowId> {
        let cached = self.hwnd.load(Ordering::Acquire);
        if let Some(id) = WindowId::from_raw(cached)
            && Window::from_id(id).is_alive()
        {
            return Some(id);
        }

        let id = self.locate()?.id()?;
        self.hwnd.store(id.as_raw(), Ordering::Release);
        Some(id)
    }

    fn refresh(&self) {
        let Some(id) = self.window() else {
            taskshift_core::log_warn!("taskbar window not found, cannot refresh");
            return;
        };
        let hwnd = HWND(id.as_raw() as *mut _);
        // SAFETY: SendMessageW with a valid HWND blocks until the taskbar's
        // thread has handled the message. Both parameters are unused.
        unsafe {
            SendMessageW(
                hwnd,
                WM_TRAY_HANDLE_DISPLAY_CHANGE,
                Some(WPARAM(0)),
                Some(LPARAM(0)),
            );
        }
    }
}
