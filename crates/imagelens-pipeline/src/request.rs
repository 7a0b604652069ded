//! Typed requests accepted by the orchestrator

use imagelens_config::ProviderKind;
use imagelens_providers::AnalysisKind;

/// What to ask the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    /// One of the built-in analysis kinds
    Kind(AnalysisKind),
    /// A caller-supplied instruction
    Custom(String),
}

impl AnalysisRequest {
    /// A non-blank prompt wins over `kind` and is forwarded as written.
    pub fn from_parts(kind: AnalysisKind, prompt: Option<&str>) -> Self {
        match prompt.filter(|p| !p.trim().is_empty()) {
            Some(prompt) => AnalysisRequest::Custom(prompt.to_string()),
            None => AnalysisRequest::Kind(kind),
        }
    }
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        AnalysisRequest::Kind(AnalysisKind::default())
    }
}

/// One image to analyze.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub source: String,
    /// Falls back to the configured default provider
    pub provider: Option<ProviderKind>,
    /// Overrides the configured credential
    pub api_key: Option<String>,
    pub analysis: AnalysisRequest,
}

impl ImageRequest {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            provider: None,
            api_key: None,
            analysis: AnalysisRequest::default(),
        }
    }

    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_analysis(mut self, analysis: AnalysisRequest) -> Self {
        self.analysis = analysis;
        self
    }
}

/// Many images sharing provider, credential and analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub sources: Vec<String>,
    pub provider: Option<ProviderKind>,
    pub api_key: Option<String>,
    pub analysis: AnalysisRequest,
}

impl BatchRequest {
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            provider: None,
            api_key: None,
            analysis: AnalysisRequest::default(),
        }
    }

    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_analysis(mut self, analysis: AnalysisRequest) -> Self {
        self.analysis = analysis;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_wins_when_not_blank() {
        assert_eq!(
            AnalysisRequest::from_parts(AnalysisKind::Text, Some("  What breed?\n")),
            AnalysisRequest::Custom("  What breed?\n".to_string())
        );
        assert_eq!(
            AnalysisRequest::from_parts(AnalysisKind::Text, Some("   ")),
            AnalysisRequest::Kind(AnalysisKind::Text)
        );
        assert_eq!(
            AnalysisRequest::from_parts(AnalysisKind::Objects, None),
            AnalysisRequest::Kind(AnalysisKind::Objects)
        );
    }

    #[test]
    fn test_defaults() {
        let request = ImageRequest::new("/tmp/a.png");
        assert_eq!(request.analysis, AnalysisRequest::Kind(AnalysisKind::Comprehensive));
        assert!(request.provider.is_none());

        let batch = BatchRequest::new(["a", "b"]).with_provider(ProviderKind::Azure);
        assert_eq!(batch.sources, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(batch.provider, Some(ProviderKind::Azure));
    }
}
