//! Background workers for watch mode

use crate::config::Config;
use crate::consts::cli_consts::polling::rate_limit_cooldown;
use crate::dashboard::DashboardAggregator;
use crate::polling::{PollState, run_unread_poller};
use crate::workers::core::EventSender;
use crate::workers::refresher::run_refresher;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Spawns the periodic refresher and the unread-count poller.
///
/// Both stop when `shutdown` is cancelled.
pub fn start_workers(
    aggregator: &DashboardAggregator,
    config: &Config,
    events: EventSender,
    shutdown: &CancellationToken,
) -> Vec<JoinHandle<()>> {
    let refresher = tokio::spawn(run_refresher(
        aggregator.clone(),
        config.refresh_interval(),
        events.clone(),
        shutdown.clone(),
    ));

    let poller_aggregator = aggregator.clone();
    let poller_shutdown = shutdown.clone();
    let mut state = PollState::new(
        Instant::now(),
        config.unread_poll_interval(),
        rate_limit_cooldown(),
    );
    let poller = tokio::spawn(async move {
        run_unread_poller(&poller_aggregator, &mut state, &events, poller_shutdown).await;
    });

    vec![refresher, poller]
}
