use crate::api::error::{ApiError, FailureKind};
use crate::logging::LogLevel;

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_fetch_error(&self, error: &ApiError) -> LogLevel {
        match error.kind() {
            // Expected while polling; never shown to the user
            FailureKind::RateLimited => LogLevel::Debug,

            // Expected, actionable state rather than a fault
            FailureKind::NotYetApproved => LogLevel::Info,

            FailureKind::Validation => LogLevel::Warn,

            FailureKind::Network => match error {
                // The server answered, but with something we can't use
                ApiError::Decode(_) | ApiError::Malformed(_) => LogLevel::Error,
                // Auth problems need attention
                ApiError::Http { status: 401, .. } => LogLevel::Error,
                _ => LogLevel::Warn,
            },
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}
