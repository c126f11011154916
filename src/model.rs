//! Marketplace domain types
//!
//! Canonical, read-only snapshots of the resources the dashboard consumes.
//! Server responses are mapped into these by [`crate::api::wire`].

use crate::ids::ResourceId;
use chrono::{DateTime, Utc};
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ProductStatus {
    Submitted,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DocumentType {
    PitchDeck,
    Other(String),
}

impl DocumentType {
    pub fn from_wire(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("PITCH_DECK") {
            DocumentType::PitchDeck
        } else {
            DocumentType::Other(raw.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: ResourceId,
    pub title: String,
    pub document_type: DocumentType,
    /// Absent on the wire means active.
    pub is_active: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    pub fn is_active_pitch_deck(&self) -> bool {
        self.document_type == DocumentType::PitchDeck && self.is_active
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ResourceId,
    pub name: String,
    pub status: ProductStatus,
    pub is_active: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub documents: Vec<Document>,
}

impl Product {
    /// Approved and active; only these contribute to aggregated stats.
    pub fn is_eligible(&self) -> bool {
        self.status == ProductStatus::Approved && self.is_active
    }
}

/// Evidence that a document was made visible to an investor.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareRecord {
    pub investor_id: ResourceId,
    pub shared_at: DateTime<Utc>,
    /// Set once, by the backend, when the investor opens the document.
    pub viewed_at: Option<DateTime<Utc>>,
}

impl ShareRecord {
    pub fn is_viewed(&self) -> bool {
        self.viewed_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentAnalytics {
    pub total_views: u64,
    pub total_downloads: u64,
    pub unique_viewers: u64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum VentureResponse {
    Pending,
    Accepted,
    Renegotiate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Commitment {
    pub id: ResourceId,
    pub investor_id: ResourceId,
    pub amount: f64,
    pub venture_response: VentureResponse,
    pub is_deal: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvestorProfile {
    pub id: ResourceId,
    pub name: String,
    pub firm: Option<String>,
    pub stages: Vec<String>,
}

impl Display for InvestorProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.firm {
            Some(firm) => write!(f, "{} ({})", self.name, firm),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MentorProfile {
    pub id: ResourceId,
    pub name: String,
    pub expertise: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestorFilter {
    pub search: Option<String>,
    pub stage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentorFilter {
    pub search: Option<String>,
}
