use taskshift_core::{Rect, WindowId};

use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::UI::WindowsAndMessaging::{
    GWL_STYLE, GetDesktopWindow, GetForegroundWindow, GetShellWindow, GetWindowLongPtrW,
    GetWindowRect, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId, IsWindow,
    IsWindowVisible, RealGetWindowClassW, WS_VISIBLE,
};

use crate::monitor;

/// A window on the Windows platform, wrapping a Win32 `HWND`.
///
/// `HWND` is an opaque handle, a number that identifies a window to the OS.
/// This struct holds that handle and queries the OS lazily for metadata.
/// The window may belong to any process and may be destroyed at any time;
/// every query tolerates a stale handle.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    hwnd: HWND,
}

impl Window {
    /// Creates a new `Window` from a raw `HWND`.
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    pub fn from_id(id: WindowId) -> Self {
        Self {
            hwnd: HWND(id.as_raw() as *mut _),
        }
    }

    /// Returns the engine-facing id, or `None` for a null handle.
    pub fn id(&self) -> Option<WindowId> {
        WindowId::from_raw(self.hwnd.0 as usize)
    }

    /// The window the user is currently working with.
    pub fn foreground() -> Option<Self> {
        // SAFETY: GetForegroundWindow takes no arguments and may return null.
        let hwnd = unsafe { GetForegroundWindow() };
        (!hwnd.is_invalid()).then(|| Self::new(hwnd))
    }

    /// Returns whether the handle still identifies an existing window.
    pub fn is_alive(&self) -> bool {
        // SAFETY: IsWindow accepts any value, including destroyed handles.
        unsafe { IsWindow(Some(self.hwnd)).as_bool() }
    }

    /// Returns whether the window and its ancestors are shown.
    pub fn is_visible(&self) -> bool {
        // SAFETY: IsWindowVisible is a simple query that returns a BOOL.
        unsafe { IsWindowVisible(self.hwnd).as_bool() }
    }

    /// Returns whether the window's own style has `WS_VISIBLE` set.
    pub fn has_visible_style(&self) -> bool {
        // SAFETY: GetWindowLongPtrW reads the style; 0 for a stale handle.
        let style = unsafe { GetWindowLongPtrW(self.hwnd, GWL_STYLE) } as u32;
        style & WS_VISIBLE.0 == WS_VISIBLE.0
    }

    /// Returns whether this is the desktop or the shell background window.
    pub fn is_shell(&self) -> bool {
        // SAFETY: both calls take no arguments and only return handles.
        let (desktop, shell) = unsafe { (GetDesktopWindow(), GetShellWindow()) };
        self.hwnd == desktop || self.hwnd == shell
    }

    /// Bounding rectangle including any invisible resize borders.
    pub fn rect(&self) -> Option<Rect> {
        let mut rc = RECT::default();
        // SAFETY: GetWindowRect writes into our RECT and fails for stale handles.
        unsafe { GetWindowRect(self.hwnd, &mut rc) }.ok()?;
        Some(monitor::rect(rc))
    }

    /// Returns the window title, empty when it has none.
    pub fn title(&self) -> String {
        // SAFETY: GetWindowTextLengthW and GetWindowTextW are safe to call
        // with any HWND. They read window text without modifying state.
        unsafe {
            let length = GetWindowTextLengthW(self.hwnd);
            if length <= 0 {
                return String::new();
            }

            // +1 for the null terminator that Windows requires
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(self.hwnd, &mut buffer).max(0);
            String::from_utf16_lossy(&buffer[..copied as usize])
        }
    }

    /// Returns the window class name.
    pub fn class(&self) -> String {
        // SAFETY: RealGetWindowClassW reads the window class name.
        // 256 is the maximum class name length in Win32.
        unsafe {
            let mut buffer = [0u16; 256];
            let length = RealGetWindowClassW(self.hwnd, &mut buffer);
            String::from_utf16_lossy(&buffer[..length as usize])
        }
    }

    /// Id of the process that created the window, 0 if unknown.
    pub fn process_id(&self) -> u32 {
        let mut pid = 0u32;
        // SAFETY: GetWindowThreadProcessId writes the owner PID into `pid`.
        unsafe { GetWindowThreadProcessId(self.hwnd, Some(&mut pid)) };
        pid
    }
}
