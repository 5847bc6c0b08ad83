//! Error types for resale data providers.

use thiserror::Error;

/// Errors that can occur while fetching resale comparables.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Search API error: {0}")]
    ApiError(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Browser session failed: {0}")]
    DriverError(String),

    #[error("Invalid search URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::RequestFailed(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::ParseError(err.to_string())
    }
}

impl From<url::ParseError> for ProviderError {
    fn from(err: url::ParseError) -> Self {
        ProviderError::InvalidUrl(err.to_string())
    }
}

impl From<thirtyfour::error::WebDriverError> for ProviderError {
    fn from(err: thirtyfour::error::WebDriverError) -> Self {
        ProviderError::DriverError(err.to_string())
    }
}

impl ProviderError {
    /// Returns true if this error is transient and another attempt against
    /// the same source may succeed (network hiccups, a flaky browser).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::RequestFailed(_) | ProviderError::DriverError(_)
        )
    }

    /// Returns true if this error will keep happening until configuration
    /// changes (rejected credentials, a bad URL template).
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::ApiError(_) | ProviderError::InvalidUrl(_)
        )
    }
}
