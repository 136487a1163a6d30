use std::num::NonZeroUsize;

/// Opaque identity of a top-level window owned by some process.
///
/// Wraps the raw pointer-sized handle value so the core never depends on
/// a platform crate. A null handle has no `WindowId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(NonZeroUsize);

impl WindowId {
    /// Creates an id from a raw handle value, or `None` for a null handle.
    pub fn from_raw(handle: usize) -> Option<Self> {
        NonZeroUsize::new(handle).map(Self)
    }

    /// Returns the raw handle value.
    pub fn as_raw(self) -> usize {
        self.0.get()
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:X}", self.as_raw())
    }
}
