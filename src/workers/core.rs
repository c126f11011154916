//! Core worker utilities

use crate::events::{Event, EventType, Source};
use crate::logging::LogLevel;
use tokio::sync::mpsc;

/// Common event sending utilities for background workers
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Send a generic event
    pub async fn send_event(&self, event: Event) {
        let _ = self.sender.send(event).await;
    }

    pub async fn send(
        &self,
        source: Source,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        let _ = self
            .sender
            .send(Event::new(source, message, event_type, log_level))
            .await;
    }

    /// A sender whose receiver is already gone; events are dropped.
    #[cfg(test)]
    pub fn disconnected() -> Self {
        let (sender, _) = mpsc::channel(1);
        Self { sender }
    }
}
