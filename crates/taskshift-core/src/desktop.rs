use crate::monitor::{MonitorId, MonitorInfo};
use crate::rect::{Point, Rect};
use crate::window::WindowId;

/// Window and monitor queries the engine needs from the host.
///
/// Each platform crate (e.g. `taskshift-windows`) provides its own
/// implementation. Queries that fail report absence (`None`/`false`)
/// instead of an error; the engine treats a failed query as "not
/// fullscreen" or "unresolved" for that call.
///
/// Monitor lookups must bypass any installed interception so the engine
/// never observes its own redirection.
pub trait Desktop {
    /// All displays in system enumeration order.
    fn monitors(&self) -> Vec<MonitorInfo>;

    /// Details for a single display.
    fn monitor_info(&self, monitor: MonitorId) -> Option<MonitorInfo>;

    /// The display containing the virtual-screen origin.
    fn primary_monitor(&self) -> Option<MonitorId>;

    /// The display nearest to `point`.
    fn nearest_monitor(&self, point: Point) -> Option<MonitorId>;

    /// The window the user is currently working with.
    fn foreground_window(&self) -> Option<WindowId>;

    /// Returns whether `window` still identifies a live window.
    fn is_window(&self, window: WindowId) -> bool;

    /// The OS visibility flag (the window and all its ancestors are shown).
    fn is_visible(&self, window: WindowId) -> bool;

    /// The visible bit of the window's own style.
    fn has_visible_style(&self, window: WindowId) -> bool;

    /// Returns whether `window` is the desktop or the shell background window.
    fn is_shell_window(&self, window: WindowId) -> bool;

    /// The window's bounding rectangle.
    fn window_rect(&self, window: WindowId) -> Option<Rect>;

    /// The window title, empty when it has none. Diagnostic only.
    fn window_title(&self, window: WindowId) -> String;

    /// Lowers the scheduling priority of the calling thread.
    ///
    /// Called once by the poller so it never competes with a fullscreen
    /// application's render thread.
    fn demote_current_thread(&self) {}
}
