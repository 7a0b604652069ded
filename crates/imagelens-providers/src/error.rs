//! Error types for the providers module

use imagelens_http::Retryable;
use thiserror::Error;

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur when interacting with vision providers
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ProviderError {
    /// Rate limited by provider
    #[error("{provider} rate limit exceeded: {message}")]
    RateLimited { provider: String, message: String },

    /// Authentication failed (never includes key details)
    #[error("{provider} authentication failed: {message}")]
    Authentication { provider: String, message: String },

    /// Remote API answered with an error
    #[error("{provider} API error: {message}")]
    Api { provider: String, message: String },

    /// Transport or decoding failure
    #[error("Unexpected error calling {provider} API: {message}")]
    Unexpected { provider: String, message: String },

    /// Image violates provider-specific limits
    #[error("{0}")]
    Validation(String),

    /// Provider has no implementation behind it
    #[error("Unsupported API provider: {0}")]
    NotSupported(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Bitmap could not be encoded for upload
    #[error("Failed to encode image: {0}")]
    Encoding(String),
}

impl Retryable for ProviderError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited { .. }
                | ProviderError::Api { .. }
                | ProviderError::Unexpected { .. }
        )
    }
}
