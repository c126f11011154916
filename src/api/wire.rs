//! Response normalization
//!
//! The backend is inconsistent about shapes: lists arrive bare or inside a
//! paginated envelope, fields carry several aliases, numbers sometimes come as
//! strings. Everything is mapped into the canonical [`crate::model`] types
//! here, so nothing downstream inspects response shape.
//!
//! Records inside a list that can't be decoded or normalized (a malformed ID,
//! a null where a timestamp belongs) are skipped one by one. A single-object
//! response that can't be normalized is an error.

use crate::api::error::ApiError;
use crate::ids::ResourceId;
use crate::model::{
    Commitment, Document, DocumentAnalytics, DocumentType, InvestorProfile, MentorProfile,
    Product, ProductStatus, ShareRecord, VentureResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Conversion from a raw wire record into a canonical type.
pub trait Normalize {
    type Output;

    fn normalize(self) -> Result<Self::Output, ApiError>;
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Paginated {
        #[serde(alias = "items", alias = "data")]
        results: Vec<T>,
    },
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Paginated { results } => results,
        }
    }
}

/// Parses a list body in any supported shape and normalizes each record.
///
/// Only the envelope has to be well-formed; items are decoded individually.
pub fn normalize_list<R>(bytes: &[u8]) -> Result<Vec<R::Output>, ApiError>
where
    R: Normalize + DeserializeOwned,
{
    let envelope: ListEnvelope<Value> = serde_json::from_slice(bytes)?;
    Ok(envelope
        .into_vec()
        .into_iter()
        .filter_map(|item| serde_json::from_value::<R>(item).ok())
        .filter_map(|raw| raw.normalize().ok())
        .collect())
}

/// Parses and normalizes a single-object body.
pub fn normalize_one<R>(bytes: &[u8]) -> Result<R::Output, ApiError>
where
    R: Normalize + DeserializeOwned,
{
    let raw: R = serde_json::from_slice(bytes)?;
    raw.normalize()
}

fn parse_id(field: &'static str, value: &str) -> Result<ResourceId, ApiError> {
    ResourceId::parse(field, value).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Either a plain ID or an embedded object carrying one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IdRef {
    Plain(String),
    Embedded { id: String },
}

impl IdRef {
    fn as_str(&self) -> &str {
        match self {
            IdRef::Plain(id) => id,
            IdRef::Embedded { id } => id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    fn value(&self) -> Result<f64, ApiError> {
        match self {
            Amount::Number(n) => Ok(*n),
            Amount::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ApiError::Malformed(format!("amount '{}' is not a number", s))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawDocument {
    id: String,
    #[serde(default, alias = "name", alias = "file_name")]
    title: Option<String>,
    #[serde(alias = "type", alias = "doc_type")]
    document_type: String,
    #[serde(default)]
    is_active: Option<bool>,
    #[serde(default, alias = "modified_at", alias = "updated")]
    updated_at: Option<DateTime<Utc>>,
}

impl Normalize for RawDocument {
    type Output = Document;

    fn normalize(self) -> Result<Document, ApiError> {
        Ok(Document {
            id: parse_id("document_id", &self.id)?,
            title: self.title.unwrap_or_default(),
            document_type: DocumentType::from_wire(&self.document_type),
            is_active: self.is_active.unwrap_or(true),
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RawProduct {
    id: String,
    #[serde(default, alias = "title")]
    name: Option<String>,
    #[serde(alias = "approval_status")]
    status: String,
    #[serde(default, alias = "active")]
    is_active: Option<bool>,
    #[serde(default, alias = "approval_date", alias = "approved_on")]
    approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    documents: Vec<RawDocument>,
}

impl Normalize for RawProduct {
    type Output = Product;

    fn normalize(self) -> Result<Product, ApiError> {
        let status = self
            .status
            .parse::<ProductStatus>()
            .map_err(|_| ApiError::Malformed(format!("unknown product status '{}'", self.status)))?;
        Ok(Product {
            id: parse_id("product_id", &self.id)?,
            name: self.name.unwrap_or_default(),
            status,
            is_active: self.is_active.unwrap_or(false),
            approved_at: self.approved_at,
            documents: self
                .documents
                .into_iter()
                .filter_map(|doc| doc.normalize().ok())
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RawShareRecord {
    #[serde(alias = "investor")]
    investor_id: IdRef,
    #[serde(alias = "created_at")]
    shared_at: DateTime<Utc>,
    #[serde(default, alias = "viewed_on")]
    viewed_at: Option<DateTime<Utc>>,
}

impl Normalize for RawShareRecord {
    type Output = ShareRecord;

    fn normalize(self) -> Result<ShareRecord, ApiError> {
        Ok(ShareRecord {
            investor_id: parse_id("investor_id", self.investor_id.as_str())?,
            shared_at: self.shared_at,
            viewed_at: self.viewed_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RawAnalytics {
    #[serde(default, alias = "views")]
    total_views: u64,
    #[serde(default, alias = "downloads")]
    total_downloads: u64,
    #[serde(default, alias = "unique_views")]
    unique_viewers: u64,
}

impl Normalize for RawAnalytics {
    type Output = DocumentAnalytics;

    fn normalize(self) -> Result<DocumentAnalytics, ApiError> {
        Ok(DocumentAnalytics {
            total_views: self.total_views,
            total_downloads: self.total_downloads,
            unique_viewers: self.unique_viewers,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RawCommitment {
    id: String,
    #[serde(alias = "investor")]
    investor_id: IdRef,
    #[serde(alias = "committed_amount")]
    amount: Amount,
    #[serde(default)]
    venture_response: Option<String>,
    #[serde(default)]
    is_deal: Option<bool>,
    #[serde(default, alias = "renegotiation_message")]
    message: Option<String>,
}

impl Normalize for RawCommitment {
    type Output = Commitment;

    fn normalize(self) -> Result<Commitment, ApiError> {
        let venture_response = match self.venture_response.as_deref() {
            None | Some("") => VentureResponse::Pending,
            Some(raw) => raw.parse::<VentureResponse>().map_err(|_| {
                ApiError::Malformed(format!("unknown venture response '{}'", raw))
            })?,
        };
        Ok(Commitment {
            id: parse_id("commitment_id", &self.id)?,
            investor_id: parse_id("investor_id", self.investor_id.as_str())?,
            amount: self.amount.value()?,
            venture_response,
            is_deal: self.is_deal.unwrap_or(false) || venture_response == VentureResponse::Accepted,
            message: self.message.filter(|m| !m.is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RawInvestor {
    id: String,
    #[serde(default, alias = "full_name", alias = "display_name")]
    name: Option<String>,
    #[serde(default, alias = "organization", alias = "company")]
    firm: Option<String>,
    #[serde(default, alias = "investment_stages", alias = "preferred_stages")]
    stages: Vec<String>,
}

impl Normalize for RawInvestor {
    type Output = InvestorProfile;

    fn normalize(self) -> Result<InvestorProfile, ApiError> {
        Ok(InvestorProfile {
            id: parse_id("investor_id", &self.id)?,
            name: self.name.unwrap_or_default(),
            firm: self.firm.filter(|f| !f.is_empty()),
            stages: self.stages,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RawMentor {
    id: String,
    #[serde(default, alias = "full_name", alias = "display_name")]
    name: Option<String>,
    #[serde(default, alias = "expertise_areas", alias = "skills")]
    expertise: Vec<String>,
}

impl Normalize for RawMentor {
    type Output = MentorProfile;

    fn normalize(self) -> Result<MentorProfile, ApiError> {
        Ok(MentorProfile {
            id: parse_id("mentor_id", &self.id)?,
            name: self.name.unwrap_or_default(),
            expertise: self.expertise,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawUnreadCount {
    Scalar(u64),
    Object {
        #[serde(alias = "unread_count", alias = "unread")]
        count: u64,
    },
}

impl Normalize for RawUnreadCount {
    type Output = u64;

    fn normalize(self) -> Result<u64, ApiError> {
        Ok(match self {
            RawUnreadCount::Scalar(count) => count,
            RawUnreadCount::Object { count } => count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_ID: &str = "0b0f6c57-5d3f-4a4e-9d33-8f8b7a5f1c01";
    const DOC_ID: &str = "3c1d2e4f-6a7b-4c8d-9e0f-1a2b3c4d5e6f";
    const INVESTOR_ID: &str = "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d";

    #[test]
    fn bare_and_paginated_lists_normalize_identically() {
        let item = format!(
            r#"{{"id":"{}","name":"Acme","status":"APPROVED","is_active":true}}"#,
            PRODUCT_ID
        );
        let bare = format!("[{}]", item);
        let paginated = format!(r#"{{"count":1,"next":null,"results":[{}]}}"#, item);
        let items = format!(r#"{{"items":[{}]}}"#, item);

        let a = normalize_list::<RawProduct>(bare.as_bytes()).unwrap();
        let b = normalize_list::<RawProduct>(paginated.as_bytes()).unwrap();
        let c = normalize_list::<RawProduct>(items.as_bytes()).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a[0].status, ProductStatus::Approved);
    }

    #[test]
    fn product_aliases_and_document_defaults() {
        let body = format!(
            r#"[{{"id":"{}","title":"Acme","approval_status":"approved","active":true,
                 "approval_date":"2024-03-01T10:00:00Z",
                 "documents":[{{"id":"{}","type":"PITCH_DECK"}}]}}]"#,
            PRODUCT_ID, DOC_ID
        );
        let products = normalize_list::<RawProduct>(body.as_bytes()).unwrap();
        let product = &products[0];
        assert_eq!(product.name, "Acme");
        assert!(product.is_eligible());
        assert!(product.approved_at.is_some());
        // A document without is_active counts as active.
        assert!(product.documents[0].is_active_pitch_deck());
    }

    #[test]
    /// One bad record must not take the whole list down.
    fn malformed_records_are_skipped() {
        let body = format!(
            r#"[{{"id":"not-a-uuid","status":"APPROVED"}},
                {{"id":"{}","status":"SUBMITTED"}},
                {{"id":"{}","status":"ARCHIVED"}}]"#,
            PRODUCT_ID, DOC_ID
        );
        let products = normalize_list::<RawProduct>(body.as_bytes()).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].status, ProductStatus::Submitted);
    }

    #[test]
    /// A record that fails to decode at all is dropped on its own.
    fn undecodable_records_are_skipped() {
        let body = format!(
            r#"{{"results":[
                {{"investor_id":"{0}","shared_at":"2024-03-03T00:00:00Z"}},
                {{"investor_id":"{0}","shared_at":null}},
                {{"shared_at":"2024-03-05T00:00:00Z"}}
            ]}}"#,
            INVESTOR_ID
        );
        let shares = normalize_list::<RawShareRecord>(body.as_bytes()).unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].investor_id.to_string(), INVESTOR_ID);
    }

    #[test]
    fn broken_envelope_is_an_error() {
        assert!(normalize_list::<RawShareRecord>(br#"{"count":3}"#).is_err());
        assert!(normalize_list::<RawShareRecord>(b"not json").is_err());
    }

    #[test]
    fn share_record_accepts_embedded_investor() {
        let body = format!(
            r#"{{"data":[
                {{"investor":{{"id":"{0}","name":"X"}},"created_at":"2024-03-02T00:00:00Z"}},
                {{"investor_id":"{0}","shared_at":"2024-03-03T00:00:00Z","viewed_at":"2024-03-04T00:00:00Z"}}
            ]}}"#,
            INVESTOR_ID
        );
        let shares = normalize_list::<RawShareRecord>(body.as_bytes()).unwrap();
        assert_eq!(shares.len(), 2);
        assert!(!shares[0].is_viewed());
        assert!(shares[1].is_viewed());
    }

    #[test]
    fn commitment_amount_as_string_and_deal_derivation() {
        let body = format!(
            r#"{{"id":"{}","investor":"{}","amount":"25000.50","venture_response":"ACCEPTED"}}"#,
            DOC_ID, INVESTOR_ID
        );
        let commitment = normalize_one::<RawCommitment>(body.as_bytes()).unwrap();
        assert_eq!(commitment.amount, 25000.50);
        assert_eq!(commitment.venture_response, VentureResponse::Accepted);
        assert!(commitment.is_deal);
    }

    #[test]
    fn commitment_without_response_is_pending() {
        let body = format!(
            r#"{{"id":"{}","investor_id":"{}","amount":1000}}"#,
            DOC_ID, INVESTOR_ID
        );
        let commitment = normalize_one::<RawCommitment>(body.as_bytes()).unwrap();
        assert_eq!(commitment.venture_response, VentureResponse::Pending);
        assert!(!commitment.is_deal);
    }

    #[test]
    fn unread_count_scalar_or_object() {
        assert_eq!(normalize_one::<RawUnreadCount>(b"7").unwrap(), 7);
        assert_eq!(normalize_one::<RawUnreadCount>(br#"{"unread_count":4}"#).unwrap(), 4);
        assert_eq!(normalize_one::<RawUnreadCount>(br#"{"count":2}"#).unwrap(), 2);
        assert!(normalize_one::<RawUnreadCount>(br#"{"total":2}"#).is_err());
    }

    #[test]
    fn analytics_missing_fields_default_to_zero() {
        let analytics = normalize_one::<RawAnalytics>(br#"{"views":12}"#).unwrap();
        assert_eq!(
            analytics,
            DocumentAnalytics {
                total_views: 12,
                total_downloads: 0,
                unique_viewers: 0
            }
        );
    }
}
