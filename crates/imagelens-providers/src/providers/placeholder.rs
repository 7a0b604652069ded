//! Placeholder for backends without an implementation

use async_trait::async_trait;
use imagelens_config::ProviderKind;
use imagelens_images::{ImageFormat, NormalizedImage};

use crate::capabilities::capability_for;
use crate::error::{ProviderError, Result};
use crate::models::{AnalysisKind, ApiCapability, DetectedObject, ExtractedText, ImageAnalysis};
use crate::provider::VisionProvider;

/// Provider with no capabilities; every operation fails with `NotSupported`.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderProvider {
    kind: ProviderKind,
}

impl PlaceholderProvider {
    /// Placeholder standing in for `kind`
    pub fn new(kind: ProviderKind) -> Self {
        Self { kind }
    }

    fn unsupported(&self) -> ProviderError {
        ProviderError::NotSupported(self.kind.to_string())
    }
}

#[async_trait]
impl VisionProvider for PlaceholderProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn supported_analysis_kinds(&self) -> &[AnalysisKind] {
        &[]
    }

    fn max_image_size_mb(&self) -> f64 {
        0.0
    }

    fn supported_formats(&self) -> &[ImageFormat] {
        &[]
    }

    fn capability(&self) -> ApiCapability {
        capability_for(self.kind)
    }

    fn validate_image(&self, _image: &NormalizedImage) -> Result<()> {
        Err(self.unsupported())
    }

    async fn describe(&self, _image: &NormalizedImage) -> Result<String> {
        Err(self.unsupported())
    }

    async fn extract_text(&self, _image: &NormalizedImage) -> Result<Vec<ExtractedText>> {
        Err(self.unsupported())
    }

    async fn detect_objects(&self, _image: &NormalizedImage) -> Result<Vec<DetectedObject>> {
        Err(self.unsupported())
    }

    async fn analyze_custom(
        &self,
        _image: &NormalizedImage,
        _prompt: &str,
    ) -> Result<ImageAnalysis> {
        Err(self.unsupported())
    }
}
