pub mod monitors;
pub mod probe;
pub mod watch;
