//! Error handling for the marketplace API boundary

use crate::ids::IdError;
use thiserror::Error;

/// How a failure should be treated by the dashboard.
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum FailureKind {
    /// Caller's account is not approved for this resource yet (403).
    NotYetApproved,
    /// Connectivity, 5xx, or an unreadable response.
    Network,
    /// Too many requests (429).
    RateLimited,
    /// Rejected locally before any request was issued.
    Validation,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to decode a JSON body from the server
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    /// The body parsed but does not describe the expected resource.
    #[error("Unexpected response: {0}")]
    Malformed(String),

    /// Input was rejected before a request was made.
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    InvalidId(#[from] IdError),
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ApiError::Http { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Reqwest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::InvalidId(_) | ApiError::InvalidInput(_) => FailureKind::Validation,
            _ => match self.status() {
                Some(403) => FailureKind::NotYetApproved,
                Some(429) => FailureKind::RateLimited,
                _ => FailureKind::Network,
            },
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind() == FailureKind::RateLimited
    }

    pub fn is_not_yet_approved(&self) -> bool {
        self.kind() == FailureKind::NotYetApproved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn status_codes_map_to_failure_kinds() {
        assert_eq!(http(403).kind(), FailureKind::NotYetApproved);
        assert_eq!(http(429).kind(), FailureKind::RateLimited);
        assert_eq!(http(500).kind(), FailureKind::Network);
        assert_eq!(http(404).kind(), FailureKind::Network);
    }

    #[test]
    fn local_rejections_are_validation_failures() {
        let err = ApiError::from(IdError::Empty { field: "product_id" });
        assert_eq!(err.kind(), FailureKind::Validation);
        assert_eq!(err.to_string(), "product_id is required");
        assert_eq!(
            ApiError::InvalidInput("message is required".into()).kind(),
            FailureKind::Validation
        );
    }

    #[test]
    fn decode_failures_count_as_network() {
        let err: ApiError = serde_json::from_str::<u64>("nope").unwrap_err().into();
        assert_eq!(err.kind(), FailureKind::Network);
        assert!(!err.is_rate_limited());
    }
}
