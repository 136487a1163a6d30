use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::gate::RoutingGate;
use crate::monitor::MonitorRegistry;

/// State shared between the poller thread and the interception adapter.
///
/// Passed around as `Arc<EngineState>`; there are no process-wide
/// statics in the engine itself.
#[derive(Debug)]
pub struct EngineState {
    pub gate: RoutingGate,
    pub monitors: MonitorRegistry,
    poll_interval_ms: AtomicU64,
}

impl EngineState {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            gate: RoutingGate::new(),
            monitors: MonitorRegistry::new(),
            poll_interval_ms: AtomicU64::new(poll_interval.as_millis() as u64),
        }
    }

    /// Sleep between two poller ticks.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.load(Ordering::Relaxed))
    }

    /// Takes effect at the poller's next sleep.
    pub fn set_poll_interval(&self, interval: Duration) {
        self.poll_interval_ms
            .store(interval.as_millis() as u64, Ordering::Relaxed);
    }
}
