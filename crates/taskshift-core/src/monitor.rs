//! Monitor identities and the registry of the two displays the engine
//! routes between.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::desktop::Desktop;
use crate::rect::Rect;

/// Opaque identity of a physical display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorId(NonZeroUsize);

impl MonitorId {
    /// Creates an id from a raw handle value, or `None` for a null handle.
    pub fn from_raw(handle: usize) -> Option<Self> {
        NonZeroUsize::new(handle).map(Self)
    }

    /// Returns the raw handle value.
    pub fn as_raw(self) -> usize {
        self.0.get()
    }
}

/// A display as reported by the host's monitor enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorInfo {
    pub id: MonitorId,
    /// Bounding rectangle in virtual-screen coordinates.
    pub rect: Rect,
    /// Work area (bounds minus taskbar and docked toolbars).
    pub work_area: Rect,
    pub is_primary: bool,
    /// Device name such as `\\.\DISPLAY1`. Diagnostic only.
    pub device: String,
}

/// Picks the `index`-th (1-based) non-primary monitor in enumeration order.
///
/// Returns `None` when `index` is zero or fewer than `index` non-primary
/// monitors exist.
pub fn nth_secondary(monitors: &[MonitorInfo], index: u32) -> Option<MonitorId> {
    let skip = (index as usize).checked_sub(1)?;
    monitors
        .iter()
        .filter(|m| !m.is_primary)
        .nth(skip)
        .map(|m| m.id)
}

/// Cached handles for the primary display and the configured secondary one.
///
/// Written by the refresh routine, read lock-free by the interception
/// points. Each handle is a single atomic word; a reader racing a refresh
/// sees either the old or the new handle, never a torn value.
#[derive(Debug, Default)]
pub struct MonitorRegistry {
    primary: AtomicUsize,
    secondary: AtomicUsize,
}

impl MonitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-resolves both handles from the host.
    ///
    /// `secondary_index` is the 1-based position among non-primary monitors.
    /// The secondary is never the monitor flagged primary. Returns `true`
    /// when both handles resolved.
    pub fn refresh(&self, desktop: &impl Desktop, secondary_index: u32) -> bool {
        let primary = desktop.primary_monitor();
        let monitors = desktop.monitors();
        let secondary =
            nth_secondary(&monitors, secondary_index).filter(|id| Some(*id) != primary);

        self.primary.store(raw(primary), Ordering::Release);
        self.secondary.store(raw(secondary), Ordering::Release);

        if crate::log::enabled() {
            log_monitor(desktop, "primary", primary);
            log_monitor(desktop, "secondary", secondary);
        }

        primary.is_some() && secondary.is_some()
    }

    /// The display containing the virtual-screen origin.
    pub fn primary(&self) -> Option<MonitorId> {
        MonitorId::from_raw(self.primary.load(Ordering::Acquire))
    }

    /// The configured secondary display, if it exists.
    pub fn secondary(&self) -> Option<MonitorId> {
        MonitorId::from_raw(self.secondary.load(Ordering::Acquire))
    }
}

fn raw(id: Option<MonitorId>) -> usize {
    id.map_or(0, MonitorId::as_raw)
}

fn log_monitor(desktop: &impl Desktop, role: &str, id: Option<MonitorId>) {
    match id.and_then(|id| desktop.monitor_info(id)) {
        Some(info) => crate::log_info!(
            "{role} monitor: {} ({}x{} at {},{})",
            info.device,
            info.rect.width,
            info.rect.height,
            info.rect.x,
            info.rect.y
        ),
        None => crate::log_warn!("{role} monitor: unresolved"),
    }
}
