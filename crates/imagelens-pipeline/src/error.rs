//! Error types for the pipeline

use imagelens_config::{ConfigError, ProviderKind};
use imagelens_images::ImageError;
use imagelens_providers::ProviderError;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Anything that can stop one image from being analyzed.
///
/// The `Display` output is what ends up in an envelope's `error` field.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No credential, unknown provider, unknown analysis kind
    #[error("{0}")]
    Configuration(String),

    /// Source loading or validation failure
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Provider-side failure
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Background normalization task did not complete
    #[error("Image processing task failed: {0}")]
    Task(String),
}

impl PipelineError {
    /// No usable credential for `provider`
    pub fn missing_api_key(provider: ProviderKind) -> Self {
        PipelineError::Configuration(format!(
            "No API key available for provider: {}",
            provider
        ))
    }
}

impl From<ConfigError> for PipelineError {
    fn from(err: ConfigError) -> Self {
        PipelineError::Configuration(err.to_string())
    }
}
