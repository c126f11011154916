//! Console messages for the watch session
//!
//! Worker events are printed through [`crate::events::Event`]'s `Display`;
//! this module covers the session's own lifecycle lines around them.

use std::time::Duration;

/// Severity of a session line, which picks its tag and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warn,
}

impl Tone {
    fn tag(self) -> &'static str {
        match self {
            Tone::Info => "\x1b[1;36m[INFO]\x1b[0m",
            Tone::Success => "\x1b[1;32m[SUCCESS]\x1b[0m",
            Tone::Warn => "\x1b[1;91m[WARN]\x1b[0m",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMessage {
    pub tone: Tone,
    pub text: String,
}

impl SessionMessage {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }

    /// The tagged line as written to the console.
    pub fn line(&self) -> String {
        format!("{} {}", self.tone.tag(), self.text)
    }

    pub fn print(&self) {
        println!("{}", self.line());
    }
}

pub fn watch_starting(api_url: &str, refresh: Duration, unread_poll: Duration) -> SessionMessage {
    SessionMessage::new(
        Tone::Info,
        format!(
            "Watching {} (refresh every {}s, unread check every {}s). Press Ctrl+C to stop.",
            api_url,
            refresh.as_secs(),
            unread_poll.as_secs()
        ),
    )
}

/// The saved login no longer matches the one the session started with.
pub fn login_changed() -> SessionMessage {
    SessionMessage::new(Tone::Warn, "Saved login changed; dashboard cleared and watch stopped")
}

pub fn shutting_down() -> SessionMessage {
    SessionMessage::new(Tone::Info, "Shutting down...")
}

pub fn exited() -> SessionMessage {
    SessionMessage::new(Tone::Success, "Dashboard watch exited")
}
