//! Recent activity feed
//!
//! Synthesized from timestamps already present on the resolved product, its
//! pitch deck and the deck's share records. Nothing here is stored
//! server-side as an event.

use crate::ids::ResourceId;
use crate::model::{Document, Product, ShareRecord};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    Approved {
        product: String,
        at: DateTime<Utc>,
    },
    Edited {
        document: String,
        at: DateTime<Utc>,
    },
    Shared {
        investor_id: ResourceId,
        at: DateTime<Utc>,
    },
    Viewed {
        investor_id: ResourceId,
        at: DateTime<Utc>,
    },
}

impl ActivityEvent {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            ActivityEvent::Approved { at, .. }
            | ActivityEvent::Edited { at, .. }
            | ActivityEvent::Shared { at, .. }
            | ActivityEvent::Viewed { at, .. } => *at,
        }
    }
}

/// Merges approval, edit, share and view events, newest first.
///
/// `resolved` is the product/pitch-deck pair from
/// [`super::pitch_deck::resolve_eligible_pitch_deck`]; other products and
/// documents contribute nothing. The returned iterator owns its events and is
/// consumed once; take the prefix you need. Events with equal timestamps keep
/// their synthesis order.
pub fn build_activity_feed(
    resolved: Option<(&Product, &Document)>,
    shares: &[ShareRecord],
) -> impl Iterator<Item = ActivityEvent> + use<> {
    let mut events = Vec::new();

    if let Some((product, document)) = resolved {
        if let Some(at) = product.approved_at {
            events.push(ActivityEvent::Approved {
                product: product.name.clone(),
                at,
            });
        }
        if let Some(at) = document.updated_at {
            events.push(ActivityEvent::Edited {
                document: document.title.clone(),
                at,
            });
        }
    }

    for share in shares {
        events.push(ActivityEvent::Shared {
            investor_id: share.investor_id,
            at: share.shared_at,
        });
        if let Some(at) = share.viewed_at {
            events.push(ActivityEvent::Viewed {
                investor_id: share.investor_id,
                at,
            });
        }
    }

    events.sort_by(|a, b| b.at().cmp(&a.at()));
    events.into_iter()
}
