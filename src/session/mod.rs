pub mod messages;
pub mod setup;
pub mod watch_mode;

pub use setup::{SessionData, connect, drain_events, setup_session};
pub use watch_mode::run_watch_mode;
