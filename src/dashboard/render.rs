//! Plain-text rendering of the dashboard for terminal output.

use super::activity::ActivityEvent;
use super::state::{DashboardView, Section};
use crate::ids::ResourceId;
use std::fmt::Write;

/// One-line status used in event logs.
pub fn summary_line(view: &DashboardView) -> String {
    let stats = view.stats();
    format!(
        "Dashboard refreshed: {} interested investors, {} pitch views, {} pending commitments, {} unread",
        stats.interested_investors, stats.pitch_views, stats.pending_commitments, view.unread_count
    )
}

fn describe(view: &DashboardView, event: &ActivityEvent) -> String {
    let investor = |id: &ResourceId| {
        view.investor_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| "an investor".to_string())
    };
    match event {
        ActivityEvent::Approved { product, .. } => format!("{} was approved", product),
        ActivityEvent::Edited { document, .. } => format!("{} was updated", document),
        ActivityEvent::Shared { investor_id, .. } => {
            format!("Pitch deck shared with {}", investor(investor_id))
        }
        ActivityEvent::Viewed { investor_id, .. } => {
            format!("{} viewed the pitch deck", investor(investor_id))
        }
    }
}

/// Full multi-section rendering.
pub fn render_dashboard(view: &DashboardView) -> String {
    let stats = view.stats();
    let mut out = String::new();

    let _ = writeln!(out, "== Dashboard ==");
    match &view.pitch_deck {
        Some(deck) => {
            let _ = writeln!(out, "Pitch deck: {} ({})", deck.document_title, deck.product_name);
        }
        None => {
            let _ = writeln!(out, "Pitch deck: none approved yet");
        }
    }
    let _ = writeln!(
        out,
        "Interested investors: {}  Views: {}  Downloads: {}  Unique viewers: {}",
        stats.interested_investors, stats.pitch_views, stats.pitch_downloads, stats.unique_viewers
    );
    let _ = writeln!(
        out,
        "Commitments: {} pending, {} deals ({:.2} committed)",
        stats.pending_commitments, stats.deals, stats.committed_amount
    );
    let _ = writeln!(out, "Unread messages: {}", view.unread_count);

    let _ = writeln!(out, "\n-- Interested investors --");
    if view.interested_investors.is_empty() {
        let _ = writeln!(out, "(none)");
    }
    for investor in &view.interested_investors {
        let viewed = if investor.pitch_viewed { "viewed" } else { "not viewed" };
        let _ = writeln!(
            out,
            "{}{}  shared {}  {}",
            investor.name,
            investor
                .firm
                .as_deref()
                .map(|f| format!(" ({})", f))
                .unwrap_or_default(),
            investor.shared_at.format("%Y-%m-%d"),
            viewed
        );
    }

    let _ = writeln!(out, "\n-- Recent activity --");
    if view.recent_activity.is_empty() {
        let _ = writeln!(out, "(none)");
    }
    for event in &view.recent_activity {
        let _ = writeln!(
            out,
            "{}  {}",
            event.at().format("%Y-%m-%d %H:%M"),
            describe(view, event)
        );
    }

    let _ = writeln!(out, "\n-- Investor directory --");
    match &view.investors {
        Section::NotLoaded => {
            let _ = writeln!(out, "(not loaded)");
        }
        Section::Ready(investors) => {
            let _ = writeln!(out, "{} available", investors.len());
        }
        Section::PendingApproval(notice) | Section::Unavailable(notice) => {
            let _ = writeln!(out, "{}", notice);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::state::APPROVAL_PENDING_MESSAGE;

    #[test]
    fn empty_view_renders_zero_state() {
        let text = render_dashboard(&DashboardView::default());
        assert!(text.contains("Pitch deck: none approved yet"));
        assert!(text.contains("Interested investors: 0"));
        assert!(text.contains("(none)"));
        assert!(text.contains("(not loaded)"));
    }

    #[test]
    /// The approval notice replaces the list, not an error banner.
    fn pending_approval_renders_notice() {
        let view = DashboardView {
            investors: Section::PendingApproval(APPROVAL_PENDING_MESSAGE.to_string()),
            ..Default::default()
        };
        let text = render_dashboard(&view);
        assert!(text.contains(APPROVAL_PENDING_MESSAGE));
        assert!(!text.contains("Failed"));
    }

    #[test]
    fn summary_mentions_unread() {
        let view = DashboardView {
            unread_count: 3,
            ..Default::default()
        };
        assert!(summary_line(&view).ends_with("3 unread"));
    }
}
