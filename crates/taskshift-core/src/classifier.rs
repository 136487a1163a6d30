//! Decides whether a window is a fullscreen application on the primary
//! display.

use crate::desktop::Desktop;
use crate::monitor::MonitorRegistry;
use crate::window::WindowId;

/// Pixels a window may fall short of the monitor on each axis and still
/// count as fullscreen. Borderless-windowed titles often end up a few
/// pixels short after compositor rounding.
pub const FULLSCREEN_TOLERANCE: i32 = 10;

/// Outcome of classifying a window, naming the first rule that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No window was given.
    NoWindow,
    /// The visibility flag or the visible style bit is off.
    Hidden,
    /// The desktop, the shell background or the taskbar itself.
    ShellWindow,
    /// The window rectangle could not be read.
    NoRect,
    /// The window's top-left corner is nearest to some other monitor.
    OffPrimary,
    /// The window does not cover the primary monitor.
    TooSmall,
    Fullscreen,
}

impl Verdict {
    pub fn is_fullscreen(self) -> bool {
        self == Verdict::Fullscreen
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::NoWindow => "no window",
            Self::Hidden => "window is not visible",
            Self::ShellWindow => "desktop, shell or taskbar window",
            Self::NoRect => "window bounds unavailable",
            Self::OffPrimary => "window is not on the primary monitor",
            Self::TooSmall => "window does not cover the primary monitor",
            Self::Fullscreen => "fullscreen on the primary monitor",
        }
    }
}

/// Classifies `window` against the primary monitor in `registry`.
///
/// `taskbar` is excluded so the engine never classifies its own target.
/// Query failures reject the window; nothing here returns an error.
pub fn classify(
    desktop: &impl Desktop,
    registry: &MonitorRegistry,
    taskbar: Option<WindowId>,
    window: Option<WindowId>,
) -> Verdict {
    let Some(window) = window else {
        return Verdict::NoWindow;
    };

    if !desktop.is_visible(window) || !desktop.has_visible_style(window) {
        return Verdict::Hidden;
    }

    if desktop.is_shell_window(window) || Some(window) == taskbar {
        return Verdict::ShellWindow;
    }

    let Some(rect) = desktop.window_rect(window) else {
        return Verdict::NoRect;
    };

    let Some(primary) = registry.primary() else {
        return Verdict::OffPrimary;
    };
    if desktop.nearest_monitor(rect.top_left()) != Some(primary) {
        return Verdict::OffPrimary;
    }

    let Some(info) = desktop.monitor_info(primary) else {
        return Verdict::TooSmall;
    };
    if !rect.covers(&info.rect, FULLSCREEN_TOLERANCE) {
        return Verdict::TooSmall;
    }

    Verdict::Fullscreen
}

/// Shorthand for `classify(..).is_fullscreen()`.
pub fn is_fullscreen_on_primary(
    desktop: &impl Desktop,
    registry: &MonitorRegistry,
    taskbar: Option<WindowId>,
    window: Option<WindowId>,
) -> bool {
    classify(desktop, registry, taskbar, window).is_fullscreen()
}
