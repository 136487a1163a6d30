//! Lifecycle of the fullscreen application that is currently holding the
//! taskbar on the secondary display.
//!
//! Two states: Idle (nothing tracked, gate released) and Tracking (one
//! window tracked, gate engaged). The tracker is the only writer of the
//! gate while the engine runs, so the gate mirrors the state after every
//! tick.

use crate::classifier;
use crate::desktop::Desktop;
use crate::state::EngineState;
use crate::taskbar::Taskbar;
use crate::window::WindowId;

/// A heartbeat line is logged once every this many ticks.
const HEARTBEAT_TICKS: u64 = 60;

/// Transitions that happened during one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// The tracked window that was found closed.
    pub released: Option<WindowId>,
    /// The window that started being tracked.
    pub engaged: Option<WindowId>,
}

#[derive(Debug, Default)]
pub struct Tracker {
    tracked: Option<WindowId>,
    last_checked: Option<WindowId>,
    ticks: u64,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fullscreen window currently being tracked.
    pub fn tracked(&self) -> Option<WindowId> {
        self.tracked
    }

    /// Runs one polling step.
    pub fn tick(
        &mut self,
        desktop: &impl Desktop,
        taskbar: &impl Taskbar,
        state: &EngineState,
    ) -> TickReport {
        self.ticks += 1;
        if self.ticks % HEARTBEAT_TICKS == 1 {
            crate::log_debug!("poller alive, tick {}", self.ticks);
        }

        let mut report = TickReport::default();

        if let Some(window) = self.tracked
            && !desktop.is_window(window)
        {
            crate::log_info!("fullscreen window {window} closed, restoring taskbar to primary");
            self.tracked = None;
            state.gate.release();
            // Re-examine whatever is in front now, even if it was seen before.
            self.last_checked = None;
            // Shutdown refreshes the taskbar itself once the gate is released.
            if !state.gate.is_unloading() {
                taskbar.refresh();
            }
            report.released = Some(window);
        }

        // Fullscreen status only changes along with the foreground window,
        // so an unchanged foreground is not classified again.
        let foreground = desktop.foreground_window();
        if foreground == self.last_checked {
            return report;
        }
        self.last_checked = foreground;

        if self.tracked.is_some() || state.gate.is_unloading() {
            return report;
        }

        let verdict =
            classifier::classify(desktop, &state.monitors, taskbar.window(), foreground);
        if verdict.is_fullscreen()
            && let Some(window) = foreground
        {
            if crate::log::enabled() {
                let title = desktop.window_title(window);
                let title = if title.is_empty() { "<no title>" } else { &title };
                crate::log_info!("fullscreen detected: {title} ({window}), moving taskbar");
            }
            // Classification may have outlasted a shutdown that already
            // released the gate.
            if !state.gate.engage() {
                return report;
            }
            self.tracked = Some(window);
            taskbar.refresh();
            report.engaged = Some(window);
        }

        report
    }
}
