//! String-argument tool surface over the orchestrator
//!
//! Arguments arrive as loosely typed strings from front ends. Bad values end
//! up as failure envelopes rather than errors.

use imagelens_config::{ProviderKind, Settings};
use imagelens_providers::{
    api_capabilities, supported_apis, AnalysisKind, ApiCapability, ProviderStatus,
};
use serde::Deserialize;

use crate::envelope::{BatchEnvelope, ProcessingEnvelope};
use crate::error::{PipelineError, Result};
use crate::orchestrator::AnalysisOrchestrator;
use crate::progress::BatchProgress;
use crate::request::{AnalysisRequest, BatchRequest, ImageRequest};

/// Optional arguments shared by the analysis tools
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolOptions {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub analysis_type: Option<String>,
    pub custom_prompt: Option<String>,
}

impl ToolOptions {
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_analysis_type(mut self, analysis_type: impl Into<String>) -> Self {
        self.analysis_type = Some(analysis_type.into());
        self
    }

    pub fn with_custom_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.custom_prompt = Some(prompt.into());
        self
    }
}

/// Image processing tools
#[derive(Debug)]
pub struct ImageTools {
    orchestrator: AnalysisOrchestrator,
}

impl ImageTools {
    /// Tools backed by the built-in providers
    pub fn new(settings: Settings) -> Result<Self> {
        Ok(Self::with_orchestrator(AnalysisOrchestrator::new(settings)?))
    }

    pub fn with_orchestrator(orchestrator: AnalysisOrchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &AnalysisOrchestrator {
        &self.orchestrator
    }

    /// Analyze one image
    pub async fn process_image(&self, source: &str, options: &ToolOptions) -> ProcessingEnvelope {
        let request = match self.image_request(source, options) {
            Ok(request) => request,
            Err(e) => {
                return ProcessingEnvelope::failure(self.provider_label(options), e.to_string())
            }
        };
        self.orchestrator.process(&request).await
    }

    /// Analyze several images; results are index-aligned with `sources`
    pub async fn analyze_batch(
        &self,
        sources: &[String],
        options: &ToolOptions,
        progress: &dyn BatchProgress,
    ) -> BatchEnvelope {
        let started = std::time::Instant::now();
        let (provider, analysis) = match self.parse_options(options) {
            Ok(parsed) => parsed,
            Err(e) => {
                let label = self.provider_label(options);
                let message = e.to_string();
                let results = sources
                    .iter()
                    .map(|_| ProcessingEnvelope::failure(label.as_str(), message.as_str()))
                    .collect();
                return BatchEnvelope::from_results(results, started.elapsed());
            }
        };

        let mut request = BatchRequest::new(sources.iter().cloned())
            .with_provider(provider)
            .with_analysis(analysis);
        request.api_key = options.api_key.clone();

        self.orchestrator.process_batch(&request, progress).await
    }

    /// Text extraction; a custom prompt still takes precedence
    pub async fn extract_text(&self, source: &str, options: &ToolOptions) -> ProcessingEnvelope {
        let options = ToolOptions {
            analysis_type: Some(AnalysisKind::Text.to_string()),
            ..options.clone()
        };
        self.process_image(source, &options).await
    }

    /// Object detection; a custom prompt still takes precedence
    pub async fn detect_objects(&self, source: &str, options: &ToolOptions) -> ProcessingEnvelope {
        let options = ToolOptions {
            analysis_type: Some(AnalysisKind::Objects.to_string()),
            ..options.clone()
        };
        self.process_image(source, &options).await
    }

    /// Availability of every provider under the current settings
    pub fn supported_apis(&self) -> Vec<ProviderStatus> {
        supported_apis(self.orchestrator.settings())
    }

    /// Capability descriptors of every provider
    pub fn api_capabilities(&self) -> Vec<ApiCapability> {
        api_capabilities()
    }

    fn image_request(&self, source: &str, options: &ToolOptions) -> Result<ImageRequest> {
        let (provider, analysis) = self.parse_options(options)?;
        let mut request = ImageRequest::new(source)
            .with_provider(provider)
            .with_analysis(analysis);
        request.api_key = options.api_key.clone();
        Ok(request)
    }

    fn parse_options(&self, options: &ToolOptions) -> Result<(ProviderKind, AnalysisRequest)> {
        let provider = match options.provider.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(raw) => raw.parse::<ProviderKind>()?,
            None => self.orchestrator.settings().default_provider,
        };

        let kind = match options.analysis_type.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(raw) => raw
                .parse::<AnalysisKind>()
                .map_err(|e| PipelineError::Configuration(e.to_string()))?,
            None => AnalysisKind::default(),
        };

        Ok((
            provider,
            AnalysisRequest::from_parts(kind, options.custom_prompt.as_deref()),
        ))
    }

    fn provider_label(&self, options: &ToolOptions) -> String {
        options
            .provider
            .as_deref()
            .map(|p| p.trim().to_ascii_lowercase())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.orchestrator.settings().default_provider.to_string())
    }
}
