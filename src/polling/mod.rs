pub mod state;
pub mod unread;

pub use state::{PollMode, PollState};
pub use unread::run_unread_poller;
