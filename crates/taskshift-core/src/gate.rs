use std::sync::atomic::{AtomicBool, Ordering};

/// Shared decision of whether taskbar placement should go to the
/// secondary display.
///
/// Written only by the poller (and the shutdown routine), read by the
/// interception points on the host's own thread. No lock is taken: each
/// flag is a single atomic word and a reader may observe a value that is
/// at most one poll interval stale.
#[derive(Debug, Default)]
pub struct RoutingGate {
    force_secondary: AtomicBool,
    unloading: AtomicBool,
}

impl RoutingGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts routing to the secondary display.
    ///
    /// Refused once unloading is latched. The flag is set before the latch
    /// is read, so an engage racing shutdown's `release` is undone here
    /// whichever store lands last. Returns whether the gate is engaged.
    pub fn engage(&self) -> bool {
        self.force_secondary.store(true, Ordering::SeqCst);
        if self.is_unloading() {
            self.force_secondary.store(false, Ordering::SeqCst);
            return false;
        }
        true
    }

    /// Stops routing to the secondary display.
    pub fn release(&self) {
        self.force_secondary.store(false, Ordering::SeqCst);
    }

    /// The literal flag value, ignoring shutdown.
    pub fn is_engaged(&self) -> bool {
        self.force_secondary.load(Ordering::SeqCst)
    }

    /// Latches shutdown. Never cleared.
    pub fn begin_unloading(&self) {
        self.unloading.store(true, Ordering::SeqCst);
    }

    pub fn is_unloading(&self) -> bool {
        self.unloading.load(Ordering::SeqCst)
    }

    /// Whether readers should route to the secondary display.
    ///
    /// Shutdown takes precedence over a stale engaged flag.
    pub fn routes_to_secondary(&self) -> bool {
        !self.is_unloading() && self.is_engaged()
    }
}
