//! Construction of provider instances from settings

use std::sync::Arc;
use std::time::Duration;

use imagelens_config::{ProviderKind, Settings};
use imagelens_http::RetryConfig;
use tracing::debug;

use crate::error::Result;
use crate::provider::VisionProvider;
use crate::providers::{OpenAiVisionProvider, PlaceholderProvider};

/// Creates a provider for a resolved identity and credential.
///
/// The pipeline depends on this trait so tests can hand it scripted providers.
pub trait ProviderFactory: Send + Sync {
    /// Build the provider for `kind` authenticated with `api_key`
    fn create(&self, kind: ProviderKind, api_key: &str) -> Result<Arc<dyn VisionProvider>>;
}

/// Factory backed by the built-in providers
#[derive(Debug, Clone)]
pub struct DefaultProviderFactory {
    timeout: Duration,
    retry: RetryConfig,
    openai_base_url: Option<String>,
}

impl DefaultProviderFactory {
    /// Factory using the timeout, attempt budget and endpoint from `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            timeout: settings.timeout(),
            retry: RetryConfig::with_max_attempts(settings.max_retries),
            openai_base_url: settings.openai_base_url.clone(),
        }
    }

    /// Replace the retry policy given to remote providers
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

impl ProviderFactory for DefaultProviderFactory {
    fn create(&self, kind: ProviderKind, api_key: &str) -> Result<Arc<dyn VisionProvider>> {
        debug!("Creating {} provider", kind);

        match kind {
            ProviderKind::OpenAi => {
                let mut provider =
                    OpenAiVisionProvider::new(api_key, self.timeout, self.retry.max_attempts)?
                        .with_retry_config(self.retry.clone());
                if let Some(base_url) = &self.openai_base_url {
                    provider = provider.with_base_url(base_url.as_str());
                }
                Ok(Arc::new(provider))
            }
            ProviderKind::Anthropic | ProviderKind::Google | ProviderKind::Azure => {
                Ok(Arc::new(PlaceholderProvider::new(kind)))
            }
        }
    }
}
