//! Settings consumed by the imagelens pipeline

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::provider::ProviderKind;

/// Upper bound accepted for `max_image_size_mb`.
pub const MAX_IMAGE_SIZE_LIMIT_MB: f64 = 100.0;

/// Upper bound accepted for `request_timeout`, in seconds.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Per-provider credential strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// OpenAI API key
    pub openai_api_key: Option<String>,
    /// Anthropic API key
    pub anthropic_api_key: Option<String>,
    /// Path to Google application credentials
    pub google_credentials_path: Option<String>,
    /// Azure Computer Vision key
    pub azure_api_key: Option<String>,
}

impl Credentials {
    /// Configured credential for `provider`, if any.
    pub fn for_provider(&self, provider: ProviderKind) -> Option<&str> {
        match provider {
            ProviderKind::OpenAi => self.openai_api_key.as_deref(),
            ProviderKind::Anthropic => self.anthropic_api_key.as_deref(),
            ProviderKind::Google => self.google_credentials_path.as_deref(),
            ProviderKind::Azure => self.azure_api_key.as_deref(),
        }
    }
}

/// Read-only settings threaded through orchestrator construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Provider used when a request does not name one
    pub default_provider: ProviderKind,
    /// Maximum accepted image payload, in MB
    pub max_image_size_mb: f64,
    /// Timeout for each I/O suspension point, in seconds
    pub request_timeout: u64,
    /// Total attempts made around a remote provider call
    pub max_retries: u32,
    /// Request budget per provider; also caps batch workers
    pub rate_limit_per_minute: u32,
    /// Provider credentials
    pub credentials: Credentials,
    /// Override for the reference provider's API base URL
    pub openai_base_url: Option<String>,
    /// Number of batch items processed at once (1 = sequential)
    pub batch_concurrency: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_provider: ProviderKind::OpenAi,
            max_image_size_mb: 10.0,
            request_timeout: 30,
            max_retries: 3,
            rate_limit_per_minute: 60,
            credentials: Credentials::default(),
            openai_base_url: None,
            batch_concurrency: 1,
        }
    }
}

impl Settings {
    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.max_image_size_mb > 0.0 && self.max_image_size_mb <= MAX_IMAGE_SIZE_LIMIT_MB) {
            return Err(ConfigError::Validation(format!(
                "max_image_size_mb must be between 0 and {}",
                MAX_IMAGE_SIZE_LIMIT_MB
            )));
        }
        if self.request_timeout == 0 || self.request_timeout > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "request_timeout must be between 1 and {} seconds",
                MAX_REQUEST_TIMEOUT_SECS
            )));
        }
        if self.max_retries == 0 {
            return Err(ConfigError::Validation(
                "max_retries must allow at least one attempt".to_string(),
            ));
        }
        if self.rate_limit_per_minute == 0 {
            return Err(ConfigError::Validation(
                "rate_limit_per_minute must be at least 1".to_string(),
            ));
        }
        if self.batch_concurrency == 0 {
            return Err(ConfigError::Validation(
                "batch_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Batch items in flight at once, never above the per-minute budget.
    pub fn batch_workers(&self) -> usize {
        let budget = usize::try_from(self.rate_limit_per_minute).unwrap_or(usize::MAX);
        self.batch_concurrency.min(budget).max(1)
    }

    /// Resolve the credential for `provider`.
    ///
    /// A non-blank `override_key` wins over the configured value. Blank
    /// credentials count as missing.
    pub fn api_key_for(
        &self,
        provider: ProviderKind,
        override_key: Option<&str>,
    ) -> Option<String> {
        override_key
            .filter(|key| is_valid_key(key))
            .or_else(|| self.credentials.for_provider(provider).filter(|key| is_valid_key(key)))
            .map(str::to_string)
    }

    /// Providers that have a usable credential configured.
    pub fn available_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|provider| self.api_key_for(*provider, None).is_some())
            .collect()
    }

    /// Builder-style credential setter, mostly for tests and embedding.
    pub fn with_api_key(mut self, provider: ProviderKind, key: impl Into<String>) -> Self {
        let key = Some(key.into());
        match provider {
            ProviderKind::OpenAi => self.credentials.openai_api_key = key,
            ProviderKind::Anthropic => self.credentials.anthropic_api_key = key,
            ProviderKind::Google => self.credentials.google_credentials_path = key,
            ProviderKind::Azure => self.credentials.azure_api_key = key,
        }
        self
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_provider, ProviderKind::OpenAi);
        assert_eq!(settings.max_image_size_mb, 10.0);
        assert_eq!(settings.request_timeout, 30);
        assert_eq!(settings.max_retries, 3);
        assert_eq!(settings.rate_limit_per_minute, 60);
        assert_eq!(settings.batch_concurrency, 1);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_image_size_range() {
        let mut settings = Settings::default();
        settings.max_image_size_mb = 0.0;
        assert!(settings.validate().is_err());

        settings.max_image_size_mb = 100.5;
        assert!(settings.validate().is_err());

        settings.max_image_size_mb = 100.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_range() {
        let mut settings = Settings::default();
        settings.request_timeout = 0;
        assert!(settings.validate().is_err());

        settings.request_timeout = 301;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout"));

        settings.request_timeout = 300;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rate_limit_caps_batch_workers() {
        let mut settings = Settings {
            batch_concurrency: 8,
            rate_limit_per_minute: 3,
            ..Settings::default()
        };
        assert_eq!(settings.batch_workers(), 3);

        settings.rate_limit_per_minute = 600;
        assert_eq!(settings.batch_workers(), 8);

        settings.rate_limit_per_minute = 0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("rate_limit_per_minute"));
    }

    #[test]
    fn test_override_key_wins() {
        let settings = Settings::default().with_api_key(ProviderKind::OpenAi, "sk-config");
        assert_eq!(
            settings.api_key_for(ProviderKind::OpenAi, Some("sk-override")),
            Some("sk-override".to_string())
        );
        assert_eq!(
            settings.api_key_for(ProviderKind::OpenAi, None),
            Some("sk-config".to_string())
        );
    }

    #[test]
    fn test_blank_keys_are_missing() {
        let settings = Settings::default().with_api_key(ProviderKind::OpenAi, "   ");
        assert_eq!(settings.api_key_for(ProviderKind::OpenAi, Some("")), None);
        assert!(settings.available_providers().is_empty());
    }

    #[test]
    fn test_google_uses_credentials_path() {
        let settings =
            Settings::default().with_api_key(ProviderKind::Google, "/etc/gcloud/creds.json");
        assert_eq!(
            settings.api_key_for(ProviderKind::Google, None).as_deref(),
            Some("/etc/gcloud/creds.json")
        );
        assert_eq!(settings.available_providers(), vec![ProviderKind::Google]);
    }
}
