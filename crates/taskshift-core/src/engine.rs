//! Activation, the poller thread, settings changes and shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::desktop::Desktop;
use crate::error::ActivationError;
use crate::policy::Interceptor;
use crate::state::EngineState;
use crate::taskbar::Taskbar;
use crate::tracker::Tracker;

/// How long shutdown waits for the poller before abandoning it.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(5);

const POLLER_THREAD_NAME: &str = "taskshift-poller";

/// A running engine: interceptions installed and the poller ticking.
///
/// Dropping the engine shuts it down.
pub struct Engine<D, T, I>
where
    D: Desktop + Send + Sync + 'static,
    T: Taskbar + Send + Sync + 'static,
    I: Interceptor,
{
    state: Arc<EngineState>,
    desktop: Arc<D>,
    taskbar: Arc<T>,
    interceptor: I,
    secondary_index: u32,
    poller: Option<Poller>,
    stopped: bool,
}

struct Poller {
    running: Arc<AtomicBool>,
    handle: thread::JoinHandle<()>,
    done: mpsc::Receiver<()>,
}

impl<D, T, I> Engine<D, T, I>
where
    D: Desktop + Send + Sync + 'static,
    T: Taskbar + Send + Sync + 'static,
    I: Interceptor,
{
    /// Activates the engine.
    ///
    /// Both monitors and the taskbar must resolve before anything is
    /// installed. On any error the host is left untouched.
    pub fn start(
        config: &EngineConfig,
        desktop: Arc<D>,
        taskbar: Arc<T>,
        mut interceptor: I,
    ) -> Result<Self, ActivationError> {
        let state = Arc::new(EngineState::new(config.poll_interval()));

        if !state.monitors.refresh(&*desktop, config.secondary_monitor) {
            crate::log_error!("need at least two monitors");
            return Err(ActivationError::MonitorsUnavailable {
                index: config.secondary_monitor,
            });
        }

        if taskbar.window().is_none() {
            crate::log_error!("taskbar window not found");
            return Err(ActivationError::TaskbarNotFound);
        }

        interceptor.install(&state)?;

        let poller = match spawn_poller(desktop.clone(), taskbar.clone(), state.clone()) {
            Ok(poller) => poller,
            Err(e) => {
                interceptor.uninstall();
                return Err(e.into());
            }
        };

        crate::log_info!(
            "engine started (secondary monitor #{}, poll every {} ms)",
            config.secondary_monitor,
            config.poll_interval_ms
        );

        Ok(Self {
            state,
            desktop,
            taskbar,
            interceptor,
            secondary_index: config.secondary_monitor,
            poller: Some(poller),
            stopped: false,
        })
    }

    /// State shared with the poller and the interception points.
    pub fn state(&self) -> &Arc<EngineState> {
        &self.state
    }

    /// Applies changed settings.
    ///
    /// The poll interval takes effect at the poller's next sleep. Returns
    /// `false` when the configured secondary monitor no longer resolves;
    /// routing then degrades to the host's own choice.
    pub fn apply_settings(&mut self, config: &EngineConfig) -> bool {
        self.state.set_poll_interval(config.poll_interval());
        self.secondary_index = config.secondary_monitor;
        self.refresh_monitors()
    }

    /// Re-enumerates monitors with the current secondary index.
    pub fn refresh_monitors(&self) -> bool {
        let complete = self
            .state
            .monitors
            .refresh(&*self.desktop, self.secondary_index);
        if !complete {
            crate::log_warn!(
                "secondary monitor #{} not found, taskbar stays put",
                self.secondary_index
            );
        }
        complete
    }

    /// Stops the poller, restores the taskbar and removes interceptions.
    ///
    /// Idempotent; also runs on drop.
    pub fn shutdown(&mut self) {
        self.shutdown_within(STOP_TIMEOUT);
    }

    fn shutdown_within(&mut self, timeout: Duration) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        crate::log_info!("shutting down");

        // Latched before the poller is told to stop so a tick that is
        // already running cannot route to the secondary monitor anymore.
        self.state.gate.begin_unloading();

        if let Some(poller) = self.poller.take() {
            poller.running.store(false, Ordering::Release);
            poller.handle.thread().unpark();
            match poller.done.recv_timeout(timeout) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    if poller.handle.join().is_err() {
                        crate::log_error!("poller thread panicked");
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    crate::log_warn!("poller did not stop within {timeout:?}, abandoning it");
                }
            }
        }

        self.state.gate.release();
        self.taskbar.refresh();
        self.interceptor.uninstall();
        crate::log_info!("engine stopped");
    }
}

impl<D, T, I> Drop for Engine<D, T, I>
where
    D: Desktop + Send + Sync + 'static,
    T: Taskbar + Send + Sync + 'static,
    I: Interceptor,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_poller<D, T>(
    desktop: Arc<D>,
    taskbar: Arc<T>,
    state: Arc<EngineState>,
) -> std::io::Result<Poller>
where
    D: Desktop + Send + Sync + 'static,
    T: Taskbar + Send + Sync + 'static,
{
    let running = Arc::new(AtomicBool::new(true));
    let running_flag = running.clone();
    let (done_tx, done) = mpsc::channel();

    let handle = thread::Builder::new()
        .name(POLLER_THREAD_NAME.into())
        .spawn(move || {
            poll(&*desktop, &*taskbar, &state, &running_flag);
            let _ = done_tx.send(());
        })?;

    Ok(Poller {
        running,
        handle,
        done,
    })
}

/// Ticks until `running` is cleared. Checked once per tick boundary.
fn poll(desktop: &impl Desktop, taskbar: &impl Taskbar, state: &EngineState, running: &AtomicBool) {
    desktop.demote_current_thread();
    crate::log_info!("poller started");

    let mut tracker = Tracker::new();
    while running.load(Ordering::Acquire) {
        tracker.tick(desktop, taskbar, state);
        thread::park_timeout(state.poll_interval());
    }

    crate::log_info!("poller stopped");
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::monitor::MonitorId;
    use crate::policy::MonitorPolicy;
    use crate::rect::Rect;
    use crate::testing::{FakeDesktop, FakeInterceptor, FakeTaskbar, FakeWindow};

    type TestEngine = Engine<FakeDesktop, FakeTaskbar, FakeInterceptor>;

    fn config() -> EngineConfig {
        EngineConfig {
            secondary_monitor: 1,
            poll_interval_ms: 5,
        }
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        condition()
    }

    /// Waits until the poller has queried the foreground at least `n` more times.
    fn wait_ticks(desktop: &FakeDesktop, n: u32) {
        let start = desktop.foreground_queries();
        assert!(wait_until(|| desktop.foreground_queries() >= start + n));
    }

    fn start(desktop: &Arc<FakeDesktop>, taskbar: &Arc<FakeTaskbar>) -> (TestEngine, FakeInterceptor) {
        let interceptor = FakeInterceptor::default();
        let engine = Engine::start(&config(), desktop.clone(), taskbar.clone(), interceptor.clone())
            .expect("engine should start with two monitors");
        (engine, interceptor)
    }

    fn primary() -> Option<MonitorId> {
        MonitorId::from_raw(FakeDesktop::PRIMARY)
    }

    fn secondary() -> Option<MonitorId> {
        MonitorId::from_raw(FakeDesktop::SECONDARY)
    }

    fn assigned(engine: &TestEngine) -> Option<MonitorId> {
        engine.state().stuck_monitor(primary(), &|| None)
    }

    #[test]
    fn no_fullscreen_window_keeps_taskbar_on_primary() {
        // Arrange
        let desktop = Arc::new(FakeDesktop::dual());
        let taskbar = Arc::new(FakeTaskbar::new());
        let window = desktop.open(FakeWindow::new(Rect::new(100, 100, 800, 600)));
        desktop.focus(Some(window));

        // Act
        let (engine, interceptor) = start(&desktop, &taskbar);
        wait_ticks(&desktop, 3);

        // Assert
        assert!(interceptor.is_installed());
        assert!(!engine.state().gate.is_engaged());
        assert_eq!(assigned(&engine), primary());
        assert_eq!(taskbar.refreshes(), 0);
    }

    #[test]
    fn fullscreen_then_close_moves_taskbar_there_and_back() {
        // Arrange
        let desktop = Arc::new(FakeDesktop::dual());
        let taskbar = Arc::new(FakeTaskbar::new());
        let (engine, _interceptor) = start(&desktop, &taskbar);
        wait_ticks(&desktop, 1);

        // Act: a window exactly covering the primary monitor comes to front
        let game = desktop.open(FakeWindow::new(Rect::new(0, 0, 1920, 1080)));
        desktop.focus(Some(game));
        assert!(wait_until(|| engine.state().gate.is_engaged()));
        wait_ticks(&desktop, 3);

        // Assert
        assert_eq!(assigned(&engine), secondary());
        assert_eq!(taskbar.refreshes(), 1);

        // Act: the game is closed externally
        desktop.close(game);
        assert!(wait_until(|| !engine.state().gate.is_engaged()));
        wait_ticks(&desktop, 3);

        // Assert
        assert_eq!(assigned(&engine), primary());
        assert_eq!(taskbar.refreshes(), 2);
    }

    #[test]
    fn single_monitor_refuses_to_start() {
        // Arrange
        let desktop = Arc::new(FakeDesktop::single());
        let taskbar = Arc::new(FakeTaskbar::new());
        let interceptor = FakeInterceptor::default();

        // Act
        let result = Engine::start(&config(), desktop.clone(), taskbar.clone(), interceptor.clone());

        // Assert
        assert!(matches!(
            result,
            Err(ActivationError::MonitorsUnavailable { index: 1 })
        ));
        assert_eq!(interceptor.install_count(), 0);
        assert_eq!(desktop.foreground_queries(), 0);
        assert_eq!(taskbar.refreshes(), 0);
    }

    #[test]
    fn missing_taskbar_refuses_to_start() {
        // Arrange
        let desktop = Arc::new(FakeDesktop::dual());
        let taskbar = Arc::new(FakeTaskbar::missing());
        let interceptor = FakeInterceptor::default();

        // Act
        let result = Engine::start(&config(), desktop, taskbar, interceptor.clone());

        // Assert
        assert!(matches!(result, Err(ActivationError::TaskbarNotFound)));
        assert_eq!(interceptor.install_count(), 0);
    }

    #[test]
    fn failed_interception_starts_no_poller() {
        // Arrange
        let desktop = Arc::new(FakeDesktop::dual());
        let taskbar = Arc::new(FakeTaskbar::new());

        // Act
        let result = Engine::start(
            &config(),
            desktop.clone(),
            taskbar.clone(),
            FakeInterceptor::failing(),
        );
        thread::sleep(Duration::from_millis(30));

        // Assert
        assert!(matches!(result, Err(ActivationError::SymbolNotFound(_))));
        assert_eq!(desktop.foreground_queries(), 0);
    }

    #[test]
    fn shutdown_while_tracking_restores_primary() {
        // Arrange
        let desktop = Arc::new(FakeDesktop::dual());
        let taskbar = Arc::new(FakeTaskbar::new());
        let game = desktop.open(FakeWindow::new(Rect::new(0, 0, 1920, 1080)));
        desktop.focus(Some(game));
        let (mut engine, interceptor) = start(&desktop, &taskbar);
        assert!(wait_until(|| engine.state().gate.is_engaged()));

        // Act
        engine.shutdown();

        // Assert
        let state = engine.state();
        assert!(!state.gate.is_engaged());
        assert!(state.gate.is_unloading());
        assert!(!interceptor.is_installed());
        assert_eq!(taskbar.refreshes(), 2);
        assert_eq!(state.stuck_monitor(primary(), &|| None), primary());
    }

    #[test]
    fn shutdown_is_idempotent_and_stops_polling() {
        // Arrange
        let desktop = Arc::new(FakeDesktop::dual());
        let taskbar = Arc::new(FakeTaskbar::new());
        let (mut engine, _interceptor) = start(&desktop, &taskbar);
        wait_ticks(&desktop, 1);

        // Act
        engine.shutdown();
        engine.shutdown();
        let queries = desktop.foreground_queries();
        thread::sleep(Duration::from_millis(30));

        // Assert
        assert_eq!(taskbar.refreshes(), 1);
        assert_eq!(desktop.foreground_queries(), queries);
    }

    #[test]
    fn drop_shuts_down() {
        // Arrange
        let desktop = Arc::new(FakeDesktop::dual());
        let taskbar = Arc::new(FakeTaskbar::new());
        let (engine, interceptor) = start(&desktop, &taskbar);
        let state = engine.state().clone();

        // Act
        drop(engine);

        // Assert
        assert!(state.gate.is_unloading());
        assert!(!interceptor.is_installed());
        assert_eq!(taskbar.refreshes(), 1);
    }

    #[test]
    fn shutdown_wakes_a_long_sleeping_poller() {
        // Arrange
        let desktop = Arc::new(FakeDesktop::dual());
        let taskbar = Arc::new(FakeTaskbar::new());
        let slow = EngineConfig {
            secondary_monitor: 1,
            poll_interval_ms: 60_000,
        };
        let mut engine = Engine::start(
            &slow,
            desktop.clone(),
            taskbar.clone(),
            FakeInterceptor::default(),
        )
        .unwrap();
        wait_ticks(&desktop, 1);

        // Act
        let started = Instant::now();
        engine.shutdown();

        // Assert
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn apply_settings_with_missing_monitor_degrades() {
        // Arrange
        let desktop = Arc::new(FakeDesktop::dual());
        let taskbar = Arc::new(FakeTaskbar::new());
        let (mut engine, _interceptor) = start(&desktop, &taskbar);

        // Act
        let complete = engine.apply_settings(&EngineConfig {
            secondary_monitor: 2,
            poll_interval_ms: 10,
        });

        // Assert
        assert!(!complete);
        assert_eq!(engine.state().monitors.secondary(), None);
        assert_eq!(engine.state().poll_interval(), Duration::from_millis(10));
        engine.state().gate.engage();
        assert_eq!(assigned(&engine), primary());
    }

    #[test]
    fn abandoned_poller_cannot_engage_after_shutdown() {
        // Arrange
        let desktop = Arc::new(FakeDesktop::dual());
        let taskbar = Arc::new(FakeTaskbar::new());
        let (mut engine, _) = start(&desktop, &taskbar);
        desktop.stall_rect_queries(Duration::from_millis(300));
        let game = desktop.open(FakeWindow::new(Rect::new(0, 0, 1920, 1080)));
        desktop.focus(Some(game));
        assert!(wait_until(|| desktop.rect_queries() > 0));

        // Act
        engine.shutdown_within(Duration::from_millis(50));
        let refreshes_at_shutdown = taskbar.refreshes();
        thread::sleep(Duration::from_millis(500));

        // Assert
        assert!(engine.state().gate.is_unloading());
        assert!(!engine.state().gate.is_engaged());
        assert_eq!(assigned(&engine), primary());
        assert_eq!(refreshes_at_shutdown, 1);
        assert_eq!(taskbar.refreshes(), 1);
    }
}
