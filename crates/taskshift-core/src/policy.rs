//! The two interception points and the contract for installing them.
//!
//! A policy decides what the host's monitor queries should answer. The
//! platform crate installs it over the host's private call paths; the
//! policy itself is pure, synchronous, re-entrant and never blocks, since
//! it runs on the host shell's UI thread.

use std::sync::Arc;

use crate::error::ActivationError;
use crate::monitor::MonitorId;
use crate::rect::Point;
use crate::state::EngineState;

/// Substitution rules applied to the host's monitor queries.
///
/// The default methods pass everything through unchanged.
pub trait MonitorPolicy {
    /// Monitor-resolution substitution for "which monitor contains `point`".
    ///
    /// `Some` replaces the host's answer; `None` delegates to the original
    /// query unmodified.
    fn monitor_at(&self, point: Point) -> Option<MonitorId> {
        let _ = point;
        None
    }

    /// Monitor-assignment substitution for the command that pins the
    /// taskbar to a monitor.
    ///
    /// `requested` is the host's own argument. `nearest_to_origin` runs the
    /// unmodified resolution query and is only called when no other monitor
    /// is available. The result is forwarded to the original command.
    fn stuck_monitor(
        &self,
        requested: Option<MonitorId>,
        nearest_to_origin: &dyn Fn() -> Option<MonitorId>,
    ) -> Option<MonitorId> {
        requested.or_else(nearest_to_origin)
    }
}

/// Leaves the host's behaviour untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl MonitorPolicy for PassThrough {}

impl MonitorPolicy for EngineState {
    fn monitor_at(&self, point: Point) -> Option<MonitorId> {
        // The host asks for the monitor at the origin when it means
        // "the primary monitor". Only that question is answered differently.
        if point.is_origin() && self.gate.routes_to_secondary() {
            return self.monitors.secondary();
        }
        None
    }

    fn stuck_monitor(
        &self,
        requested: Option<MonitorId>,
        nearest_to_origin: &dyn Fn() -> Option<MonitorId>,
    ) -> Option<MonitorId> {
        if self.gate.is_unloading() {
            return requested.or_else(nearest_to_origin);
        }

        let substitute = if self.gate.is_engaged() {
            self.monitors.secondary()
        } else {
            self.monitors.primary()
        };

        substitute.or(requested).or_else(nearest_to_origin)
    }
}

/// Installs a policy over the host's call paths.
pub trait Interceptor {
    /// Installs both interception points, reading decisions from `state`.
    ///
    /// On error nothing is left installed.
    fn install(&mut self, state: &Arc<EngineState>) -> Result<(), ActivationError>;

    /// Removes the interception points. Safe to call when not installed.
    fn uninstall(&mut self);
}

/// An interceptor that installs nothing. Used for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInterception;

impl Interceptor for NoInterception {
    fn install(&mut self, _state: &Arc<EngineState>) -> Result<(), ActivationError> {
        Ok(())
    }

    fn uninstall(&mut self) {}
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::FakeDesktop;

    fn state() -> EngineState {
        let state = EngineState::new(Duration::from_millis(10));
        assert!(state.monitors.refresh(&FakeDesktop::dual(), 1));
        state
    }

    fn primary() -> Option<MonitorId> {
        MonitorId::from_raw(FakeDesktop::PRIMARY)
    }

    fn secondary() -> Option<MonitorId> {
        MonitorId::from_raw(FakeDesktop::SECONDARY)
    }

    fn nowhere() -> Option<MonitorId> {
        panic!("fallback must not run when a monitor is resolved")
    }

    #[test]
    fn origin_query_is_redirected_only_while_engaged() {
        // Arrange
        let state = state();

        // Act / Assert
        assert_eq!(state.monitor_at(Point::ORIGIN), None);
        state.gate.engage();
        assert_eq!(state.monitor_at(Point::ORIGIN), secondary());
    }

    #[test]
    fn non_origin_query_is_never_redirected() {
        // Arrange
        let state = state();
        state.gate.engage();

        // Act / Assert
        assert_eq!(state.monitor_at(Point::new(1, 0)), None);
        assert_eq!(state.monitor_at(Point::new(2000, 500)), None);
    }

    #[test]
    fn origin_query_delegates_without_secondary() {
        // Arrange
        let state = EngineState::new(Duration::from_millis(10));
        state.monitors.refresh(&FakeDesktop::single(), 1);
        state.gate.engage();

        // Act / Assert
        assert_eq!(state.monitor_at(Point::ORIGIN), None);
    }

    #[test]
    fn origin_query_delegates_while_unloading() {
        // Arrange
        let state = state();
        state.gate.engage();
        state.gate.begin_unloading();

        // Act / Assert
        assert_eq!(state.monitor_at(Point::ORIGIN), None);
    }

    #[test]
    fn assignment_uses_primary_when_idle() {
        // Arrange
        let state = state();

        // Act
        let monitor = state.stuck_monitor(secondary(), &nowhere);

        // Assert
        assert_eq!(monitor, primary());
    }

    #[test]
    fn assignment_uses_secondary_when_engaged() {
        // Arrange
        let state = state();
        state.gate.engage();

        // Act
        let monitor = state.stuck_monitor(primary(), &nowhere);

        // Assert
        assert_eq!(monitor, secondary());
    }

    #[test]
    fn assignment_is_idempotent() {
        // Arrange
        let state = state();
        state.gate.engage();

        // Act
        let first = state.stuck_monitor(primary(), &nowhere);
        let second = state.stuck_monitor(primary(), &nowhere);

        // Assert
        assert_eq!(first, second);
    }

    #[test]
    fn assignment_passes_through_while_unloading() {
        // Arrange
        let state = state();
        state.gate.engage();
        state.gate.begin_unloading();

        // Act
        let monitor = state.stuck_monitor(primary(), &nowhere);

        // Assert
        assert_eq!(monitor, primary());
    }

    #[test]
    fn assignment_falls_back_to_origin_when_nothing_resolved() {
        // Arrange
        let state = EngineState::new(Duration::from_millis(10));
        let origin = MonitorId::from_raw(0x99);

        // Act
        let monitor = state.stuck_monitor(None, &|| origin);

        // Assert
        assert_eq!(monitor, origin);
    }

    #[test]
    fn pass_through_leaves_host_answers_alone() {
        // Arrange
        let policy = PassThrough;

        // Act / Assert
        assert_eq!(policy.monitor_at(Point::ORIGIN), None);
        assert_eq!(policy.stuck_monitor(secondary(), &nowhere), secondary());
    }
}
