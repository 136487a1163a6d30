//! In-memory host doubles for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use crate::desktop::Desktop;
use crate::error::ActivationError;
use crate::monitor::{MonitorId, MonitorInfo};
use crate::policy::Interceptor;
use crate::rect::{Point, Rect};
use crate::state::EngineState;
use crate::taskbar::Taskbar;
use crate::window::WindowId;

pub fn monitor(id: usize, rect: Rect, is_primary: bool) -> MonitorInfo {
    MonitorInfo {
        id: MonitorId::from_raw(id).unwrap(),
        rect,
        work_area: Rect::new(rect.x, rect.y, rect.width, rect.height - 48),
        is_primary,
        device: format!("\\\\.\\DISPLAY{id}"),
    }
}

#[derive(Debug, Clone)]
pub struct FakeWindow {
    rect: Rect,
    visible: bool,
    style: bool,
    shell: bool,
    has_rect: bool,
    title: String,
}

impl FakeWindow {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            visible: true,
            style: true,
            shell: false,
            has_rect: true,
            title: "Game".into(),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn without_style(mut self) -> Self {
        self.style = false;
        self
    }

    pub fn shell(mut self) -> Self {
        self.shell = true;
        self
    }

    pub fn without_rect(mut self) -> Self {
        self.has_rect = false;
        self
    }
}

#[derive(Default)]
struct Inner {
    monitors: Vec<MonitorInfo>,
    windows: HashMap<WindowId, FakeWindow>,
    foreground: Option<WindowId>,
    next_id: usize,
}

/// A scriptable desktop: monitors, windows and a foreground window.
#[derive(Default)]
pub struct FakeDesktop {
    inner: Mutex<Inner>,
    foreground_queries: AtomicU32,
    rect_queries: AtomicU32,
    rect_delay_ms: AtomicU64,
}

impl FakeDesktop {
    pub const PRIMARY: usize = 0x10;
    pub const SECONDARY: usize = 0x20;

    pub fn with_monitors(monitors: Vec<MonitorInfo>) -> Self {
        let desktop = Self::default();
        {
            let mut inner = desktop.inner.lock().unwrap();
            inner.monitors = monitors;
            inner.next_id = 0x1000;
        }
        desktop
    }

    /// A 1920x1080 primary at the origin and a 1920x1080 secondary to its right.
    pub fn dual() -> Self {
        Self::with_monitors(vec![
            monitor(Self::PRIMARY, Rect::new(0, 0, 1920, 1080), true),
            monitor(Self::SECONDARY, Rect::new(1920, 0, 1920, 1080), false),
        ])
    }

    pub fn single() -> Self {
        Self::with_monitors(vec![monitor(
            Self::PRIMARY,
            Rect::new(0, 0, 1920, 1080),
            true,
        )])
    }

    pub fn open(&self, window: FakeWindow) -> WindowId {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 0x10;
        let id = WindowId::from_raw(inner.next_id).unwrap();
        inner.windows.insert(id, window);
        id
    }

    pub fn close(&self, window: WindowId) {
        self.inner.lock().unwrap().windows.remove(&window);
    }

    /// Swaps the properties of an open window, keeping its identity.
    pub fn replace(&self, id: WindowId, window: FakeWindow) {
        self.inner.lock().unwrap().windows.insert(id, window);
    }

    pub fn focus(&self, window: Option<WindowId>) {
        self.inner.lock().unwrap().foreground = window;
    }

    pub fn foreground_queries(&self) -> u32 {
        self.foreground_queries.load(Ordering::SeqCst)
    }

    pub fn rect_queries(&self) -> u32 {
        self.rect_queries.load(Ordering::SeqCst)
    }

    /// Makes every `window_rect` query block for `delay`, holding the
    /// caller inside the classifier.
    pub fn stall_rect_queries(&self, delay: Duration) {
        self.rect_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    fn window(&self, window: WindowId) -> Option<FakeWindow> {
        self.inner.lock().unwrap().windows.get(&window).cloned()
    }
}

fn distance(rect: &Rect, point: Point) -> i64 {
    let dx = (rect.x - point.x).max(point.x - (rect.x + rect.width - 1)).max(0) as i64;
    let dy = (rect.y - point.y).max(point.y - (rect.y + rect.height - 1)).max(0) as i64;
    dx * dx + dy * dy
}

impl Desktop for FakeDesktop {
    fn monitors(&self) -> Vec<MonitorInfo> {
        self.inner.lock().unwrap().monitors.clone()
    }

    fn monitor_info(&self, monitor: MonitorId) -> Option<MonitorInfo> {
        self.monitors().into_iter().find(|m| m.id == monitor)
    }

    fn primary_monitor(&self) -> Option<MonitorId> {
        let monitors = self.monitors();
        monitors
            .iter()
            .find(|m| m.rect.contains(Point::ORIGIN))
            .or_else(|| monitors.iter().find(|m| m.is_primary))
            .map(|m| m.id)
    }

    fn nearest_monitor(&self, point: Point) -> Option<MonitorId> {
        self.monitors()
            .iter()
            .min_by_key(|m| distance(&m.rect, point))
            .map(|m| m.id)
    }

    fn foreground_window(&self) -> Option<WindowId> {
        self.foreground_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.lock().unwrap().foreground
    }

    fn is_window(&self, window: WindowId) -> bool {
        self.window(window).is_some()
    }

    fn is_visible(&self, window: WindowId) -> bool {
        self.window(window).is_some_and(|w| w.visible)
    }

    fn has_visible_style(&self, window: WindowId) -> bool {
        self.window(window).is_some_and(|w| w.style)
    }

    fn is_shell_window(&self, window: WindowId) -> bool {
        self.window(window).is_some_and(|w| w.shell)
    }

    fn window_rect(&self, window: WindowId) -> Option<Rect> {
        self.rect_queries.fetch_add(1, Ordering::SeqCst);
        let delay = self.rect_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            thread::sleep(Duration::from_millis(delay));
        }
        self.window(window).filter(|w| w.has_rect).map(|w| w.rect)
    }

    fn window_title(&self, window: WindowId) -> String {
        self.window(window).map(|w| w.title).unwrap_or_default()
    }
}

/// Counts refresh requests.
#[derive(Default)]
pub struct FakeTaskbar {
    window: Option<WindowId>,
    refreshes: AtomicU32,
}

impl FakeTaskbar {
    pub fn new() -> Self {
        Self {
            window: WindowId::from_raw(0xBA5E),
            refreshes: AtomicU32::new(0),
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }

    pub fn refreshes(&self) -> u32 {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl Taskbar for FakeTaskbar {
    fn window(&self) -> Option<WindowId> {
        self.window
    }

    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Records install/uninstall calls; can be told to fail.
#[derive(Default, Clone)]
pub struct FakeInterceptor {
    pub installed: Arc<AtomicBool>,
    pub installs: Arc<AtomicU32>,
    pub fail: bool,
}

impl FakeInterceptor {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    pub fn install_count(&self) -> u32 {
        self.installs.load(Ordering::SeqCst)
    }
}

impl Interceptor for FakeInterceptor {
    fn install(&mut self, _state: &Arc<EngineState>) -> Result<(), ActivationError> {
        if self.fail {
            return Err(ActivationError::SymbolNotFound(
                "TrayUI::_SetStuckMonitor".into(),
            ));
        }
        self.installs.fetch_add(1, Ordering::SeqCst);
        self.installed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn uninstall(&mut self) {
        self.installed.store(false, Ordering::SeqCst);
    }
}
