use taskshift_core::{Desktop, MonitorId, MonitorInfo, Point, Rect, WindowId};
use windows::Win32::System::Threading::{
    GetCurrentThread, SetThreadPriority, THREAD_PRIORITY_BELOW_NORMAL,
};

use crate::monitor;
use crate::window::Window;

/// The live Win32 desktop.
///
/// Monitor lookups go through the unhooked `MonitorFromPoint` so the
/// engine never sees its own redirection.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Desktop;

impl Desktop for Win32Desktop {
    fn monitors(&self) -> Vec<MonitorInfo> {
        monitor::enumerate_monitors().unwrap_or_else(|e| {
            taskshift_core::log_warn!("monitor enumeration failed: {e}");
            Vec::new()
        })
    }

    fn monitor_info(&self, id: MonitorId) -> Option<MonitorInfo> {
        monitor::monitor_info(monitor::hmonitor(Some(id)))
    }

    fn primary_monitor(&self) -> Option<MonitorId> {
        monitor::primary_monitor()
    }

    fn nearest_monitor(&self, point: Point) -> Option<MonitorId> {
        monitor::nearest_monitor(point)
    }

    fn foreground_window(&self) -> Option<WindowId> {
        Window::foreground().and_then(|w| w.id())
    }

    fn is_window(&self, window: WindowId) -> bool {
        Window::from_id(window).is_alive()
    }

    fn is_visible(&self, window: WindowId) -> bool {
        Window::from_id(window).is_visible()
    }

    fn has_visible_style(&self, window: WindowId) -> bool {
        Window::from_id(window).has_visible_style()
    }

    fn is_shell_window(&self, window: WindowId) -> bool {
        Window::from_id(window).is_shell()
    }

    fn window_rect(&self, window: WindowId) -> Option<Rect> {
        Window::from_id(window).rect()
    }

    fn window_title(&self, window: WindowId) -> String {
        Window::from_id(window).title()
    }

    fn demote_current_thread(&self) {
        // SAFETY: GetCurrentThread returns a pseudo handle that needs no closing.
        if let Err(e) = unsafe { SetThreadPriority(GetCurrentThread(), THREAD_PRIORITY_BELOW_NORMAL) } {
            taskshift_core::log_warn!("could not lower poller priority: {e}");
        }
    }
}
