//! The capability interface every vision backend implements

use async_trait::async_trait;
use imagelens_config::ProviderKind;
use imagelens_images::{ImageFormat, NormalizedImage};

use crate::error::{ProviderError, Result};
use crate::models::{AnalysisKind, ApiCapability, DetectedObject, ExtractedText, ImageAnalysis};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Core trait that all vision providers must implement
///
/// Implementations hold only immutable configuration, so one instance can be
/// shared across concurrent batch items.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider identity
    fn kind(&self) -> ProviderKind;

    /// Analysis kinds this provider can produce
    fn supported_analysis_kinds(&self) -> &[AnalysisKind];

    /// Largest image accepted, in MB of uncompressed RGB data
    fn max_image_size_mb(&self) -> f64;

    /// Formats accepted by this provider
    fn supported_formats(&self) -> &[ImageFormat];

    /// Longest side accepted, in pixels; `None` means unbounded
    fn max_dimension(&self) -> Option<u32> {
        None
    }

    /// Static capability descriptor
    fn capability(&self) -> ApiCapability;

    /// Check a normalized image against this provider's own limits.
    ///
    /// The size is estimated as `width * height * 3` bytes since the encoded
    /// payload size is not known until upload.
    fn validate_image(&self, image: &NormalizedImage) -> Result<()> {
        let metadata = &image.metadata;
        let formats = self.supported_formats();

        if !formats.contains(&metadata.format) {
            let supported = formats
                .iter()
                .map(ImageFormat::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ProviderError::Validation(format!(
                "Unsupported image format: {}. Supported formats: {}",
                metadata.format, supported
            )));
        }

        let estimated_mb = metadata.width as f64 * metadata.height as f64 * 3.0 / BYTES_PER_MB;
        if estimated_mb > self.max_image_size_mb() {
            return Err(ProviderError::Validation(format!(
                "Image too large: ~{:.1}MB. Maximum size: {}MB",
                estimated_mb,
                self.max_image_size_mb()
            )));
        }

        if let Some(limit) = self.max_dimension() {
            if metadata.width.max(metadata.height) > limit {
                return Err(ProviderError::Validation(format!(
                    "Image dimensions {}x{} exceed maximum {}px",
                    metadata.width, metadata.height, limit
                )));
            }
        }

        Ok(())
    }

    /// Free-text description of the image
    async fn describe(&self, image: &NormalizedImage) -> Result<String>;

    /// Text visible in the image
    async fn extract_text(&self, image: &NormalizedImage) -> Result<Vec<ExtractedText>>;

    /// Objects visible in the image
    async fn detect_objects(&self, image: &NormalizedImage) -> Result<Vec<DetectedObject>>;

    /// Answer a caller-supplied prompt; the raw answer lands in `description`
    async fn analyze_custom(
        &self,
        image: &NormalizedImage,
        prompt: &str,
    ) -> Result<ImageAnalysis>;

    /// Run one analysis kind.
    ///
    /// Comprehensive analysis issues description, text and object requests
    /// in that order and merges them into one result.
    async fn analyze(&self, image: &NormalizedImage, kind: AnalysisKind) -> Result<ImageAnalysis> {
        self.validate_image(image)?;

        let mut analysis = ImageAnalysis::default();
        if kind.wants_description() {
            analysis.description = Some(self.describe(image).await?);
        }
        if kind.wants_text() {
            analysis.text = self.extract_text(image).await?;
        }
        if kind.wants_objects() {
            analysis.objects = self.detect_objects(image).await?;
        }
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use image::DynamicImage;
    use imagelens_images::ImageMetadata;

    use super::*;

    /// Records the order of calls and answers with canned values.
    struct ScriptedProvider {
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedProvider {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl VisionProvider for ScriptedProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::OpenAi
        }

        fn supported_analysis_kinds(&self) -> &[AnalysisKind] {
            &AnalysisKind::ALL
        }

        fn max_image_size_mb(&self) -> f64 {
            1.0
        }

        fn supported_formats(&self) -> &[ImageFormat] {
            &[ImageFormat::Png, ImageFormat::Jpeg]
        }

        fn capability(&self) -> ApiCapability {
            unimplemented!("not needed")
        }

        async fn describe(&self, _image: &NormalizedImage) -> Result<String> {
            self.record("describe");
            Ok("a scene".to_string())
        }

        async fn extract_text(&self, _image: &NormalizedImage) -> Result<Vec<ExtractedText>> {
            self.record("text");
            Ok(vec![ExtractedText::new("hello", 0.9)])
        }

        async fn detect_objects(&self, _image: &NormalizedImage) -> Result<Vec<DetectedObject>> {
            self.record("objects");
            Ok(vec![DetectedObject::new("cat", 0.9)])
        }

        async fn analyze_custom(
            &self,
            _image: &NormalizedImage,
            prompt: &str,
        ) -> Result<ImageAnalysis> {
            Ok(ImageAnalysis {
                description: Some(prompt.to_string()),
                ..Default::default()
            })
        }
    }

    fn normalized(width: u32, height: u32, format: ImageFormat) -> NormalizedImage {
        NormalizedImage {
            image: DynamicImage::new_rgb8(1, 1),
            metadata: ImageMetadata {
                width,
                height,
                format,
                mode: "RGB".to_string(),
                size_bytes: 100,
                resized: false,
                original_size: None,
            },
        }
    }

    #[tokio::test]
    async fn test_comprehensive_order_and_merge() {
        let provider = ScriptedProvider::new();
        let analysis = provider
            .analyze(&normalized(10, 10, ImageFormat::Png), AnalysisKind::Comprehensive)
            .await
            .unwrap();

        assert_eq!(*provider.calls.lock().unwrap(), vec!["describe", "text", "objects"]);
        assert_eq!(analysis.description.as_deref(), Some("a scene"));
        assert_eq!(analysis.text.len(), 1);
        assert_eq!(analysis.objects.len(), 1);
    }

    #[tokio::test]
    async fn test_single_kind_issues_one_call() {
        let provider = ScriptedProvider::new();
        let analysis = provider
            .analyze(&normalized(10, 10, ImageFormat::Png), AnalysisKind::Objects)
            .await
            .unwrap();

        assert_eq!(*provider.calls.lock().unwrap(), vec!["objects"]);
        assert!(analysis.description.is_none());
        assert!(analysis.text.is_empty());
    }

    #[tokio::test]
    async fn test_validation_runs_before_calls() {
        let provider = ScriptedProvider::new();
        let err = provider
            .analyze(&normalized(10, 10, ImageFormat::Gif), AnalysisKind::Description)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Unsupported image format: GIF. Supported formats: PNG, JPEG"
        );
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_size_estimate() {
        let provider = ScriptedProvider::new();
        // 600 * 600 * 3 bytes is just over 1 MB
        let err = provider
            .validate_image(&normalized(600, 600, ImageFormat::Jpeg))
            .unwrap_err();
        assert_eq!(err.to_string(), "Image too large: ~1.0MB. Maximum size: 1MB");

        assert!(provider
            .validate_image(&normalized(500, 500, ImageFormat::Jpeg))
            .is_ok());
    }
}
