//! Periodic dashboard refresh

use super::core::EventSender;
use crate::dashboard::{DashboardAggregator, RefreshOutcome};
use crate::events::{EventType, Source};
use crate::logging::LogLevel;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Re-runs the aggregator every `interval` until `shutdown` fires.
///
/// The first refresh happens immediately. A slow refresh delays the next
/// tick instead of bunching ticks up behind it.
pub async fn run_refresher(
    aggregator: DashboardAggregator,
    interval: Duration,
    events: EventSender,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            _ = shutdown.cancelled() => break,
            outcome = aggregator.refresh() => outcome,
        };
        if outcome == RefreshOutcome::Skipped {
            events
                .send(
                    Source::Refresher,
                    "Previous refresh still running; skipped".to_string(),
                    EventType::Waiting,
                    LogLevel::Debug,
                )
                .await;
        }
    }
}
