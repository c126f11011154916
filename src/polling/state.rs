//! Unread-count poll scheduling
//!
//! Pure timing state for the unread-message poller. Callers pass `now`
//! explicitly, so transitions are testable without a running timer.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum PollMode {
    /// Requests go out every `interval`.
    Active,
    /// Rate limited; nothing is sent until the cool-down ends.
    Suppressed,
}

#[derive(Debug, Clone)]
pub struct PollState {
    mode: PollMode,
    next_allowed_at: Instant,
    interval: Duration,
    cooldown: Duration,
}

impl PollState {
    /// Starts active, with the first request allowed immediately.
    pub fn new(now: Instant, interval: Duration, cooldown: Duration) -> Self {
        Self {
            mode: PollMode::Active,
            next_allowed_at: now,
            interval,
            cooldown,
        }
    }

    pub fn mode(&self) -> PollMode {
        self.mode
    }

    pub fn next_allowed_at(&self) -> Instant {
        self.next_allowed_at
    }

    /// Moves `Suppressed -> Active` once the cool-down has elapsed.
    /// Returns true if the transition happened.
    pub fn resume_if_elapsed(&mut self, now: Instant) -> bool {
        if self.mode == PollMode::Suppressed && now >= self.next_allowed_at {
            self.mode = PollMode::Active;
            return true;
        }
        false
    }

    /// Check if a request may be issued at `now`
    pub fn can_request(&mut self, now: Instant) -> bool {
        self.resume_if_elapsed(now);
        self.mode == PollMode::Active && now >= self.next_allowed_at
    }

    /// Time until the next request is allowed
    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.next_allowed_at.saturating_duration_since(now)
    }

    pub fn record_success(&mut self, now: Instant) {
        self.next_allowed_at = now + self.interval;
    }

    /// Any failure other than rate limiting keeps the regular cadence.
    pub fn record_failure(&mut self, now: Instant) {
        self.next_allowed_at = now + self.interval;
    }

    pub fn record_rate_limited(&mut self, now: Instant) {
        self.mode = PollMode::Suppressed;
        self.next_allowed_at = now + self.cooldown;
    }
}
