pub mod classifier;
pub mod config;
pub mod desktop;
pub mod engine;
pub mod error;
pub mod gate;
pub mod log;
pub mod monitor;
pub mod policy;
pub mod rect;
pub mod state;
pub mod taskbar;
pub mod tracker;
pub mod window;

#[cfg(test)]
mod testing;

pub use classifier::{Verdict, classify, is_fullscreen_on_primary};
pub use config::Config;
pub use desktop::Desktop;
pub use engine::Engine;
pub use error::{ActivationError, WindowResult};
pub use monitor::{MonitorId, MonitorInfo, MonitorRegistry};
pub use policy::{Interceptor, MonitorPolicy, NoInterception, PassThrough};
pub use rect::{Point, Rect};
pub use state::EngineState;
pub use taskbar::Taskbar;
pub use window::WindowId;
