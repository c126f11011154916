//! Dashboard view model
//!
//! A denormalized snapshot assembled by the aggregator. Counts are always
//! derived from the stored lists, never tracked separately.

use super::activity::ActivityEvent;
use super::interested::InterestedInvestor;
use crate::ids::ResourceId;
use crate::model::{
    Commitment, DocumentAnalytics, InvestorProfile, Product, ShareRecord, VentureResponse,
};
use chrono::{DateTime, Utc};

/// Shown instead of an error banner while the investor directory is locked.
pub const APPROVAL_PENDING_MESSAGE: &str = "Your venture is awaiting approval. The investor \
     directory becomes available once an administrator approves your account.";

/// Load state of an independently fetched list.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    /// Not requested in this view.
    NotLoaded,
    Ready(Vec<T>),
    /// The caller is not approved for this list yet.
    PendingApproval(String),
    /// The fetch failed; the section renders empty.
    Unavailable(String),
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Section::NotLoaded
    }
}

impl<T> Section<T> {
    /// Loaded items; empty for any non-ready state.
    pub fn items(&self) -> &[T] {
        match self {
            Section::Ready(items) => items,
            _ => &[],
        }
    }

    /// User-facing explanation when the section is not ready.
    pub fn notice(&self) -> Option<&str> {
        match self {
            Section::NotLoaded | Section::Ready(_) => None,
            Section::PendingApproval(msg) | Section::Unavailable(msg) => Some(msg),
        }
    }

    pub fn is_pending_approval(&self) -> bool {
        matches!(self, Section::PendingApproval(_))
    }
}

/// The pitch deck all share/analytics data hangs off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchDeckRef {
    pub product_id: ResourceId,
    pub document_id: ResourceId,
    pub product_name: String,
    pub document_title: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub products: Vec<Product>,
    pub pitch_deck: Option<PitchDeckRef>,
    pub shares: Vec<ShareRecord>,
    pub analytics: DocumentAnalytics,
    pub interested_investors: Vec<InterestedInvestor>,
    /// Directory the interested investors were resolved against; only
    /// requested when a pitch deck resolves.
    pub investors: Section<InvestorProfile>,
    pub commitments: Vec<Commitment>,
    pub recent_activity: Vec<ActivityEvent>,
    pub unread_count: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardStats {
    pub eligible_products: usize,
    pub interested_investors: usize,
    pub pitch_views: u64,
    pub pitch_downloads: u64,
    pub unique_viewers: u64,
    pub viewed_shares: usize,
    pub pending_commitments: usize,
    pub deals: usize,
    pub committed_amount: f64,
}

impl DashboardView {
    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            eligible_products: self.products.iter().filter(|p| p.is_eligible()).count(),
            interested_investors: self.interested_investors.len(),
            pitch_views: self.analytics.total_views,
            pitch_downloads: self.analytics.total_downloads,
            unique_viewers: self.analytics.unique_viewers,
            viewed_shares: self.shares.iter().filter(|s| s.is_viewed()).count(),
            pending_commitments: self
                .commitments
                .iter()
                .filter(|c| c.venture_response == VentureResponse::Pending)
                .count(),
            deals: self.commitments.iter().filter(|c| c.is_deal).count(),
            committed_amount: self
                .commitments
                .iter()
                .filter(|c| c.is_deal)
                .map(|c| c.amount)
                .sum(),
        }
    }

    /// Replaces a commitment in place, matched by ID.
    pub fn upsert_commitment(&mut self, commitment: Commitment) {
        match self.commitments.iter_mut().find(|c| c.id == commitment.id) {
            Some(existing) => *existing = commitment,
            None => self.commitments.push(commitment),
        }
    }

    /// Display name for an investor seen in this view, if known.
    pub fn investor_name(&self, investor_id: &ResourceId) -> Option<&str> {
        self.interested_investors
            .iter()
            .find(|i| &i.investor_id == investor_id)
            .map(|i| i.name.as_str())
            .or_else(|| {
                self.investors
                    .items()
                    .iter()
                    .find(|i| &i.id == investor_id)
                    .map(|i| i.name.as_str())
            })
    }
}
