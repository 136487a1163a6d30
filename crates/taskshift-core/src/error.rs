use std::io;

use thiserror::Error;

/// Result type for platform queries, matching the rest of the crate family.
pub type WindowResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Reasons the engine declines to activate.
///
/// None of these affect the host: when activation fails nothing is
/// installed and the taskbar keeps its native behaviour.
#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("at least two monitors are required (secondary monitor #{index} not found)")]
    MonitorsUnavailable { index: u32 },

    #[error("taskbar window not found in this process")]
    TaskbarNotFound,

    #[error("could not load {0}")]
    ModuleLoad(String),

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("failed to install hook: {0}")]
    Hook(String),

    #[error("failed to spawn poller thread: {0}")]
    Spawn(#[from] io::Error),

    #[error("interception is already active")]
    AlreadyActive,
}
