//! Session setup and initialization

use crate::api::ApiClient;
use crate::config::Config;
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::dashboard::DashboardAggregator;
use crate::environment::Environment;
use crate::events::Event;
use crate::runtime::start_workers;
use crate::workers::core::EventSender;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Session data for watch mode
pub struct SessionData {
    /// Event receiver for worker events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Join handles for worker tasks
    pub join_handles: Vec<JoinHandle<()>>,
    /// Cancelled to stop all workers
    pub shutdown: CancellationToken,
    pub aggregator: DashboardAggregator,
    /// Token the session was started with
    pub api_token: Option<String>,
    /// Re-read to notice a login change while watching
    pub config_path: PathBuf,
    pub refresh_interval: Duration,
    pub unread_poll_interval: Duration,
}

/// Builds an authenticated aggregator and the receiving end of its event channel.
///
/// Fails if no API token has been saved with `login`.
pub fn connect(
    config: &Config,
    environment: &Environment,
) -> Result<(DashboardAggregator, mpsc::Receiver<Event>, EventSender), Box<dyn Error>> {
    let Some(token) = config.api_token.clone() else {
        return Err(Box::from("Not logged in. Run `login --token <TOKEN>` first."));
    };

    let (sender, receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let events = EventSender::new(sender);
    let client = ApiClient::new(environment.clone(), Some(token));
    let aggregator = DashboardAggregator::new(Arc::new(client), events.clone());
    Ok((aggregator, receiver, events))
}

/// Prints whatever events are already queued, respecting `RUST_LOG`.
pub fn drain_events(receiver: &mut mpsc::Receiver<Event>) {
    while let Ok(event) = receiver.try_recv() {
        if event.should_display() {
            println!("{}", event);
        }
    }
}

/// Connects and starts the background workers for watch mode.
pub fn setup_session(
    config: &Config,
    config_path: PathBuf,
    environment: Environment,
) -> Result<SessionData, Box<dyn Error>> {
    let (aggregator, event_receiver, events) = connect(config, &environment)?;
    let shutdown = CancellationToken::new();
    let join_handles = start_workers(&aggregator, config, events, &shutdown);

    Ok(SessionData {
        event_receiver,
        join_handles,
        shutdown,
        aggregator,
        api_token: config.api_token.clone(),
        config_path,
        refresh_interval: config.refresh_interval(),
        unread_poll_interval: config.unread_poll_interval(),
    })
}
