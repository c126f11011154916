//! Unread-count polling loop

use super::state::{PollMode, PollState};
use crate::dashboard::DashboardAggregator;
use crate::events::Event;
use crate::workers::core::EventSender;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

/// Polls the unread-message count until `shutdown` fires.
///
/// The caller owns `state`; the loop only reads and advances it, so the
/// schedule survives restarts of the loop and can be inspected afterwards.
pub async fn run_unread_poller(
    aggregator: &DashboardAggregator,
    state: &mut PollState,
    events: &EventSender,
    shutdown: CancellationToken,
) {
    loop {
        if state.resume_if_elapsed(Instant::now()) {
            events
                .send_event(Event::poll_mode_change(
                    PollMode::Active,
                    "Resuming unread message checks".to_string(),
                ))
                .await;
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = aggregator.poll_unread_count(state) => {}
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = sleep_until(state.next_allowed_at()) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketplaceApi;
    use crate::api::error::ApiError;
    use crate::events::EventType;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    const INTERVAL: Duration = Duration::from_secs(30);
    const COOLDOWN: Duration = Duration::from_secs(300);

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: String::new(),
        }
    }

    /// Mock whose nth call (0-based) is answered by `respond(n)`.
    fn counting_api(
        respond: impl Fn(usize) -> Result<u64, ApiError> + Send + 'static,
    ) -> (MockMarketplaceApi, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut api = MockMarketplaceApi::new();
        api.expect_unread_count()
            .returning(move || respond(counter.fetch_add(1, Ordering::SeqCst)));
        (api, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_pauses_for_cooldown_then_resumes() {
        let (api, calls) = counting_api(|n| if n == 0 { Err(http(429)) } else { Ok(2) });
        let (tx, mut rx) = mpsc::channel(100);
        let events = EventSender::new(tx);
        let aggregator = DashboardAggregator::new(Arc::new(api), events.clone());
        let mut state = PollState::new(Instant::now(), INTERVAL, COOLDOWN);

        // Just short of the cool-down: only the rate-limited request went out
        let _ = timeout(
            COOLDOWN - Duration::from_secs(1),
            run_unread_poller(&aggregator, &mut state, &events, CancellationToken::new()),
        )
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.mode(), PollMode::Suppressed);

        // Past the cool-down: resumed, polled, and back on the interval
        let _ = timeout(
            Duration::from_secs(2),
            run_unread_poller(&aggregator, &mut state, &events, CancellationToken::new()),
        )
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(state.mode(), PollMode::Active);
        assert_eq!(aggregator.view().await.unread_count, 2);

        let mut modes = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if event.event_type == EventType::StateChange {
                modes.extend(event.poll_mode);
            }
        }
        assert_eq!(modes, vec![PollMode::Suppressed, PollMode::Active]);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_keep_fixed_interval() {
        let (api, calls) = counting_api(|_| Err(http(500)));
        let aggregator = DashboardAggregator::new(Arc::new(api), EventSender::disconnected());
        let mut state = PollState::new(Instant::now(), INTERVAL, COOLDOWN);

        // Requests at 0, 30, 60 and 90 seconds
        let _ = timeout(
            Duration::from_secs(95),
            run_unread_poller(
                &aggregator,
                &mut state,
                &EventSender::disconnected(),
                CancellationToken::new(),
            ),
        )
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(state.mode(), PollMode::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_shutdown() {
        let (api, calls) = counting_api(|_| Ok(1));
        let aggregator = DashboardAggregator::new(Arc::new(api), EventSender::disconnected());
        let mut state = PollState::new(Instant::now(), INTERVAL, COOLDOWN);
        let shutdown = CancellationToken::new();

        let canceller = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(45)).await;
            canceller.cancel();
        });
        run_unread_poller(&aggregator, &mut state, &EventSender::disconnected(), shutdown).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
