//! Single-image orchestration
//!
//! resolve -> normalize -> provider gate -> provider call -> envelope.
//! Every failure along the way becomes a `success = false` envelope.

use std::sync::Arc;
use std::time::Instant;

use imagelens_config::{ProviderKind, Settings};
use imagelens_images::{source::display_source, ImageNormalizer, NormalizedImage, SourceResolver};
use imagelens_providers::{DefaultProviderFactory, ImageAnalysis, ProviderFactory, VisionProvider};
use tracing::{debug, info, warn};

use crate::envelope::{AnalysisResult, ProcessingEnvelope};
use crate::error::{PipelineError, Result};
use crate::request::{AnalysisRequest, ImageRequest};

/// Drives one image through the pipeline.
///
/// Holds only immutable configuration, so batch items can share it.
pub struct AnalysisOrchestrator {
    settings: Arc<Settings>,
    resolver: SourceResolver,
    normalizer: ImageNormalizer,
    factory: Arc<dyn ProviderFactory>,
}

impl AnalysisOrchestrator {
    /// Orchestrator using the built-in providers
    pub fn new(settings: Settings) -> Result<Self> {
        let factory = Arc::new(DefaultProviderFactory::from_settings(&settings));
        Self::with_factory(settings, factory)
    }

    /// Orchestrator using a custom provider factory
    pub fn with_factory(settings: Settings, factory: Arc<dyn ProviderFactory>) -> Result<Self> {
        settings.validate()?;

        let resolver = SourceResolver::new(settings.timeout())?;
        let normalizer = ImageNormalizer::new(settings.max_image_size_mb);

        Ok(Self {
            settings: Arc::new(settings),
            resolver,
            normalizer,
            factory,
        })
    }

    /// Settings this orchestrator was built with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolve the credential for `provider` and build the provider.
    ///
    /// Fails without any remote call when no credential is available.
    pub fn resolve_provider(
        &self,
        provider: ProviderKind,
        api_key: Option<&str>,
    ) -> Result<Arc<dyn VisionProvider>> {
        let key = self
            .settings
            .api_key_for(provider, api_key)
            .ok_or_else(|| PipelineError::missing_api_key(provider))?;
        Ok(self.factory.create(provider, &key)?)
    }

    /// Analyze one image. Always returns exactly one envelope.
    pub async fn process(&self, request: &ImageRequest) -> ProcessingEnvelope {
        let kind = request.provider.unwrap_or(self.settings.default_provider);

        match self.resolve_provider(kind, request.api_key.as_deref()) {
            Ok(provider) => {
                self.process_with(provider.as_ref(), &request.source, &request.analysis)
                    .await
            }
            Err(e) => {
                warn!("Cannot process {}: {}", display_source(&request.source), e);
                ProcessingEnvelope::failure(kind.as_str(), e.to_string())
            }
        }
    }

    /// Analyze one image with an already resolved provider.
    pub async fn process_with(
        &self,
        provider: &dyn VisionProvider,
        source: &str,
        analysis: &AnalysisRequest,
    ) -> ProcessingEnvelope {
        let started = Instant::now();
        let kind = provider.kind();

        match self.run(provider, source, analysis).await {
            Ok((normalized, answer)) => {
                let elapsed = started.elapsed();
                let result = AnalysisResult::new(answer, normalized.metadata, kind, elapsed);
                let envelope = ProcessingEnvelope::success(kind.as_str(), result);
                info!(
                    "Request {} analyzed by {} in {:.2}s",
                    envelope.request_id,
                    kind,
                    elapsed.as_secs_f64()
                );
                envelope
            }
            Err(e) => {
                let envelope = ProcessingEnvelope::failure(kind.as_str(), e.to_string());
                warn!(
                    "Request {} for {} failed: {}",
                    envelope.request_id,
                    display_source(source),
                    e
                );
                envelope
            }
        }
    }

    async fn run(
        &self,
        provider: &dyn VisionProvider,
        source: &str,
        analysis: &AnalysisRequest,
    ) -> Result<(NormalizedImage, ImageAnalysis)> {
        let raw = self.resolver.resolve(source).await?;

        // Decoding and resampling are CPU bound
        let normalizer = self.normalizer.clone();
        let normalized = tokio::task::spawn_blocking(move || normalizer.normalize(raw))
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))??;

        debug!(
            "Normalized {} to {}x{} {} (resized: {})",
            display_source(source),
            normalized.metadata.width,
            normalized.metadata.height,
            normalized.metadata.format,
            normalized.metadata.resized
        );

        provider.validate_image(&normalized)?;

        let answer = match analysis {
            AnalysisRequest::Kind(kind) => provider.analyze(&normalized, *kind).await?,
            AnalysisRequest::Custom(prompt) => provider.analyze_custom(&normalized, prompt).await?,
        };

        Ok((normalized, answer))
    }
}

impl std::fmt::Debug for AnalysisOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisOrchestrator")
            .field("default_provider", &self.settings.default_provider)
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}
