//! Event System
//!
//! Types and implementations for background worker events and logging

use crate::logging::{LogLevel, should_log_with_env};
use crate::polling::PollMode;
use chrono::Local;
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Source {
    /// Assembles the dashboard view model.
    Aggregator,
    /// Polls the unread-message count.
    UnreadPoller,
    /// Re-runs the aggregator on an interval.
    Refresher,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Waiting,
    StateChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
    /// Set on poller state change events
    pub poll_mode: Option<PollMode>,
}

impl Event {
    pub fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
            poll_mode: None,
        }
    }

    pub fn poll_mode_change(mode: PollMode, msg: String) -> Self {
        Self {
            poll_mode: Some(mode),
            ..Self::new(Source::UnreadPoller, msg, EventType::StateChange, LogLevel::Info)
        }
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.event_type, self.timestamp, self.source, self.msg
        )
    }
}
