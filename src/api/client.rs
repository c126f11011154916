//! Marketplace API Client
//!
//! JSON-over-HTTP implementation of [`MarketplaceApi`].

use crate::api::MarketplaceApi;
use crate::api::error::ApiError;
use crate::api::wire::{
    Normalize, RawAnalytics, RawCommitment, RawInvestor, RawMentor, RawProduct, RawShareRecord,
    RawUnreadCount, normalize_list, normalize_one,
};
use crate::consts::cli_consts::http;
use crate::environment::Environment;
use crate::ids::ResourceId;
use crate::model::{
    Commitment, DocumentAnalytics, InvestorFilter, InvestorProfile, MentorFilter, MentorProfile,
    Product, ShareRecord,
};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

// User-Agent string with client version
const USER_AGENT: &str = concat!("venture-dashboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    environment: Environment,
    api_token: Option<String>,
}

impl ApiClient {
    pub fn new(environment: Environment, api_token: Option<String>) -> Self {
        Self {
            client: ClientBuilder::new()
                .connect_timeout(http::connect_timeout())
                .timeout(http::request_timeout())
                .build()
                .expect("Failed to create HTTP client"),
            environment,
            api_token,
        }
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.environment.api_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn with_headers(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json");
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_bytes(&self, endpoint: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.build_url(endpoint);
        let response = self.with_headers(self.client.get(&url)).send().await?;

        let response = Self::handle_response_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn post_bytes<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.build_url(endpoint);
        let response = self
            .with_headers(self.client.post(&url))
            .json(body)
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_list<R>(&self, endpoint: &str) -> Result<Vec<R::Output>, ApiError>
    where
        R: Normalize + DeserializeOwned,
    {
        let bytes = self.get_bytes(endpoint).await?;
        normalize_list::<R>(&bytes)
    }

    async fn get_one<R>(&self, endpoint: &str) -> Result<R::Output, ApiError>
    where
        R: Normalize + DeserializeOwned,
    {
        let bytes = self.get_bytes(endpoint).await?;
        normalize_one::<R>(&bytes)
    }

    async fn post_one<R, B>(&self, endpoint: &str, body: &B) -> Result<R::Output, ApiError>
    where
        R: Normalize + DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = self.post_bytes(endpoint, body).await?;
        normalize_one::<R>(&bytes)
    }
}

/// Builds `path?k=v&...`, skipping empty values.
fn with_query(path: &str, params: &[(&str, Option<&str>)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| format!("{}={}", key, urlencoding::encode(v)))
        })
        .collect();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query.join("&"))
    }
}

fn document_path(product_id: ResourceId, document_id: ResourceId) -> String {
    format!("products/{}/documents/{}", product_id, document_id)
}

#[derive(Serialize)]
struct ShareRequest {
    investor_id: ResourceId,
}

#[derive(Serialize)]
struct RenegotiateRequest {
    message: String,
}

#[async_trait::async_trait]
impl MarketplaceApi for ApiClient {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    async fn my_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_list::<RawProduct>("products/mine").await
    }

    async fn investors(&self, filter: &InvestorFilter) -> Result<Vec<InvestorProfile>, ApiError> {
        let endpoint = with_query(
            "investors",
            &[
                ("search", filter.search.as_deref()),
                ("stage", filter.stage.as_deref()),
            ],
        );
        self.get_list::<RawInvestor>(&endpoint).await
    }

    async fn mentors(&self, filter: &MentorFilter) -> Result<Vec<MentorProfile>, ApiError> {
        let endpoint = with_query("mentors", &[("search", filter.search.as_deref())]);
        self.get_list::<RawMentor>(&endpoint).await
    }

    async fn document_shares(
        &self,
        product_id: ResourceId,
        document_id: ResourceId,
    ) -> Result<Vec<ShareRecord>, ApiError> {
        let endpoint = format!("{}/shares", document_path(product_id, document_id));
        self.get_list::<RawShareRecord>(&endpoint).await
    }

    async fn document_analytics(
        &self,
        product_id: ResourceId,
        document_id: ResourceId,
    ) -> Result<DocumentAnalytics, ApiError> {
        let endpoint = format!("{}/analytics", document_path(product_id, document_id));
        self.get_one::<RawAnalytics>(&endpoint).await
    }

    async fn share_document(
        &self,
        product_id: ResourceId,
        document_id: ResourceId,
        investor_id: ResourceId,
    ) -> Result<ShareRecord, ApiError> {
        let endpoint = format!("{}/shares", document_path(product_id, document_id));
        self.post_one::<RawShareRecord, _>(&endpoint, &ShareRequest { investor_id })
            .await
    }

    async fn product_commitments(
        &self,
        product_id: ResourceId,
    ) -> Result<Vec<Commitment>, ApiError> {
        let endpoint = format!("products/{}/commitments", product_id);
        self.get_list::<RawCommitment>(&endpoint).await
    }

    async fn accept_commitment(
        &self,
        product_id: ResourceId,
        commitment_id: ResourceId,
    ) -> Result<Commitment, ApiError> {
        let endpoint = format!("products/{}/commitments/{}/accept", product_id, commitment_id);
        self.post_one::<RawCommitment, _>(&endpoint, &serde_json::json!({}))
            .await
    }

    async fn renegotiate_commitment(
        &self,
        product_id: ResourceId,
        commitment_id: ResourceId,
        message: String,
    ) -> Result<Commitment, ApiError> {
        let endpoint = format!(
            "products/{}/commitments/{}/renegotiate",
            product_id, commitment_id
        );
        self.post_one::<RawCommitment, _>(&endpoint, &RenegotiateRequest { message })
            .await
    }

    async fn unread_count(&self) -> Result<u64, ApiError> {
        self.get_one::<RawUnreadCount>("messages/unread-count").await
    }
}
