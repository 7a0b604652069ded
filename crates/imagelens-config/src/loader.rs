//! Settings loader
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. Optional TOML file
//! 3. Environment variables (process environment or an injected map)

use std::path::PathBuf;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::provider::ProviderKind;
use crate::settings::{Credentials, Settings};

/// Flat view of every recognised key, as it appears in files and the environment.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    default_api_provider: Option<String>,
    max_image_size_mb: Option<f64>,
    request_timeout: Option<u64>,
    max_retries: Option<u32>,
    rate_limit_per_minute: Option<u32>,
    openai_api_key: Option<String>,
    anthropic_api_key: Option<String>,
    google_application_credentials: Option<String>,
    azure_computer_vision_key: Option<String>,
    openai_base_url: Option<String>,
    batch_concurrency: Option<usize>,
}

/// Builds [`Settings`] from layered sources.
#[derive(Debug, Default)]
pub struct SettingsLoader {
    file: Option<PathBuf>,
    env_vars: Option<config::Map<String, String>>,
}

impl SettingsLoader {
    /// Loader reading only defaults and the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a TOML settings file; a missing file is ignored.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Replace the process environment with an explicit variable map.
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Load and validate settings.
    pub fn load(&self) -> Result<Settings> {
        let mut builder = Config::builder();

        if let Some(path) = &self.file {
            debug!(path = %path.display(), "Reading settings file");
            builder = builder.add_source(
                File::from(path.clone())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let environment = match &self.env_vars {
            Some(vars) => Environment::default().source(Some(vars.clone())),
            None => {
                // .env is optional; a missing file is not an error
                dotenv::dotenv().ok();
                Environment::default()
            }
        };
        builder = builder.add_source(environment.ignore_empty(true));

        let raw: RawSettings = builder.build()?.try_deserialize()?;
        let settings = Self::assemble(raw)?;
        settings.validate()?;

        debug!(
            provider = %settings.default_provider,
            max_image_size_mb = settings.max_image_size_mb,
            request_timeout = settings.request_timeout,
            configured = settings.available_providers().len(),
            "Settings loaded"
        );

        Ok(settings)
    }

    fn assemble(raw: RawSettings) -> Result<Settings> {
        let defaults = Settings::default();

        let default_provider = match raw.default_api_provider {
            Some(name) => name.parse::<ProviderKind>()?,
            None => defaults.default_provider,
        };

        Ok(Settings {
            default_provider,
            max_image_size_mb: raw.max_image_size_mb.unwrap_or(defaults.max_image_size_mb),
            request_timeout: raw.request_timeout.unwrap_or(defaults.request_timeout),
            max_retries: raw.max_retries.unwrap_or(defaults.max_retries),
            rate_limit_per_minute: raw
                .rate_limit_per_minute
                .unwrap_or(defaults.rate_limit_per_minute),
            credentials: Credentials {
                openai_api_key: raw.openai_api_key,
                anthropic_api_key: raw.anthropic_api_key,
                google_credentials_path: raw.google_application_credentials,
                azure_api_key: raw.azure_computer_vision_key,
            },
            openai_base_url: raw.openai_base_url,
            batch_concurrency: raw.batch_concurrency.unwrap_or(defaults.batch_concurrency),
        })
    }
}
