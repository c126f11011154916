//! Watch mode execution

use super::{SessionData, messages};
use crate::config::Config;
use crate::dashboard::render_dashboard;
use crate::events::{EventType, Source};
use std::path::Path;

/// The token currently saved on disk; `None` after a logout.
fn saved_token(config_path: &Path) -> Option<String> {
    Config::load_from_file(config_path)
        .ok()
        .and_then(|config| config.api_token)
}

/// Runs the dashboard in the foreground until Ctrl+C.
///
/// Worker events are logged to the console and each successful refresh
/// re-renders the full dashboard. If the saved login changes underneath the
/// session, the view is dropped and the session ends.
pub async fn run_watch_mode(mut session: SessionData) -> Result<(), Box<dyn std::error::Error>> {
    messages::watch_starting(
        &session.aggregator.environment().api_url(),
        session.refresh_interval,
        session.unread_poll_interval,
    )
    .print();

    // Trigger shutdown on Ctrl+C
    let shutdown = session.shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    let mut login_check = tokio::time::interval(session.refresh_interval);
    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                if event.should_display() {
                    println!("{}", event);
                }
                if event.source == Source::Aggregator && event.event_type == EventType::Success {
                    println!("{}", render_dashboard(&session.aggregator.view().await));
                }
            }
            _ = login_check.tick() => {
                if saved_token(&session.config_path) != session.api_token {
                    session.aggregator.switch_context().await;
                    messages::login_changed().print();
                    session.shutdown.cancel();
                }
            }
            _ = session.shutdown.cancelled() => {
                break;
            }
        }
    }

    // Wait for workers to finish
    drop(session.event_receiver);
    messages::shutting_down().print();
    for handle in session.join_handles {
        let _ = handle.await;
    }
    messages::exited().print();

    Ok(())
}
