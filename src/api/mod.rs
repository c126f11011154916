use crate::api::error::ApiError;
use crate::environment::Environment;
use crate::ids::ResourceId;
use crate::model::{
    Commitment, DocumentAnalytics, InvestorFilter, InvestorProfile, MentorFilter, MentorProfile,
    Product, ShareRecord,
};

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;
pub mod wire;

#[cfg(test)]
use mockall::automock;

/// The remote marketplace service, as seen by the dashboard.
///
/// All identifiers are [`ResourceId`]s, so malformed input is rejected before
/// an implementation is ever called.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait MarketplaceApi: Send + Sync {
    fn environment(&self) -> &Environment;

    /// Products owned by the caller's venture.
    async fn my_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Investor directory. Fails with 403 while the caller is unapproved.
    async fn investors(&self, filter: &InvestorFilter) -> Result<Vec<InvestorProfile>, ApiError>;

    async fn mentors(&self, filter: &MentorFilter) -> Result<Vec<MentorProfile>, ApiError>;

    /// Share records for a product document.
    async fn document_shares(
        &self,
        product_id: ResourceId,
        document_id: ResourceId,
    ) -> Result<Vec<ShareRecord>, ApiError>;

    async fn document_analytics(
        &self,
        product_id: ResourceId,
        document_id: ResourceId,
    ) -> Result<DocumentAnalytics, ApiError>;

    /// Makes a document visible to an investor.
    async fn share_document(
        &self,
        product_id: ResourceId,
        document_id: ResourceId,
        investor_id: ResourceId,
    ) -> Result<ShareRecord, ApiError>;

    /// Commitments pledged against a product.
    async fn product_commitments(&self, product_id: ResourceId)
    -> Result<Vec<Commitment>, ApiError>;

    async fn accept_commitment(
        &self,
        product_id: ResourceId,
        commitment_id: ResourceId,
    ) -> Result<Commitment, ApiError>;

    async fn renegotiate_commitment(
        &self,
        product_id: ResourceId,
        commitment_id: ResourceId,
        message: String,
    ) -> Result<Commitment, ApiError>;

    /// Unread message count. May fail with 429.
    async fn unread_count(&self) -> Result<u64, ApiError>;
}
