use crate::window::WindowId;

/// The host's primary taskbar window.
pub trait Taskbar {
    /// The taskbar window, if it exists in the current process.
    fn window(&self) -> Option<WindowId>;

    /// Asks the taskbar to re-evaluate its display layout.
    ///
    /// The host answers by re-running its own placement logic, which in
    /// turn consults the interception points. Does nothing when the
    /// taskbar cannot be located.
    fn refresh(&self);
}
