//! Result envelopes returned to callers
//!
//! Field names are a compatibility surface for downstream consumers and must
//! not change.

use std::time::Duration;

use chrono::Utc;
use imagelens_config::ProviderKind;
use imagelens_images::ImageMetadata;
use imagelens_providers::{DetectedObject, ExtractedText, ImageAnalysis};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Image metadata stamped with provider identity and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Normalized image metadata
    #[serde(flatten)]
    pub image: ImageMetadata,
    /// Seconds from request entry to provider completion
    pub processing_time: f64,
    /// Provider that produced the analysis
    pub api_provider: ProviderKind,
}

/// Analysis of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Image description, or the answer to a custom prompt
    pub description: Option<String>,
    /// Detected objects
    pub objects: Vec<DetectedObject>,
    /// Extracted text
    pub text: Vec<ExtractedText>,
    /// Image and request metadata
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Stamp a provider answer with metadata
    pub fn new(
        analysis: ImageAnalysis,
        image: ImageMetadata,
        provider: ProviderKind,
        elapsed: Duration,
    ) -> Self {
        Self {
            description: analysis.description,
            objects: analysis.objects,
            text: analysis.text,
            metadata: AnalysisMetadata {
                image,
                processing_time: elapsed.as_secs_f64(),
                api_provider: provider,
            },
        }
    }
}

/// Outcome for one requested image.
///
/// `success` is true exactly when `analysis` is present and `error` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingEnvelope {
    pub success: bool,
    pub provider: String,
    pub analysis: Option<AnalysisResult>,
    pub error: Option<String>,
    pub request_id: String,
    /// UNIX epoch seconds
    pub timestamp: f64,
}

impl ProcessingEnvelope {
    /// Successful envelope with a fresh request id
    pub fn success(provider: impl Into<String>, analysis: AnalysisResult) -> Self {
        Self {
            success: true,
            provider: provider.into(),
            analysis: Some(analysis),
            error: None,
            request_id: new_request_id(),
            timestamp: now(),
        }
    }

    /// Failed envelope with a fresh request id
    pub fn failure(provider: impl Into<String>, error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.is_empty() {
            error = "Unknown error".to_string();
        }

        Self {
            success: false,
            provider: provider.into(),
            analysis: None,
            error: Some(error),
            request_id: new_request_id(),
            timestamp: now(),
        }
    }

    /// Whether the success flag agrees with the payload
    pub fn is_consistent(&self) -> bool {
        self.success == self.analysis.is_some() && self.success == self.error.is_none()
    }
}

/// Outcome for a batch; `results[i]` belongs to input `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEnvelope {
    pub total_images: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<ProcessingEnvelope>,
    /// Wall-clock seconds for the whole batch
    pub processing_time: f64,
}

impl BatchEnvelope {
    /// Aggregate per-item envelopes
    pub fn from_results(results: Vec<ProcessingEnvelope>, elapsed: Duration) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        Self {
            total_images: results.len(),
            successful,
            failed: results.len() - successful,
            results,
            processing_time: elapsed.as_secs_f64(),
        }
    }

    /// Whether every item succeeded with a payload that matches its flag
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.results.iter().all(|r| r.success && r.is_consistent())
    }
}

fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

fn now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use imagelens_images::ImageFormat;

    use super::*;

    fn metadata() -> ImageMetadata {
        ImageMetadata {
            width: 10,
            height: 20,
            format: ImageFormat::Png,
            mode: "RGB".to_string(),
            size_bytes: 300,
            resized: false,
            original_size: None,
        }
    }

    fn result() -> AnalysisResult {
        AnalysisResult::new(
            ImageAnalysis {
                description: Some("a cat".to_string()),
                ..Default::default()
            },
            metadata(),
            ProviderKind::OpenAi,
            Duration::from_millis(1500),
        )
    }

    #[test]
    fn test_envelope_field_names() {
        let json = serde_json::to_value(ProcessingEnvelope::success("openai", result())).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["analysis", "error", "provider", "request_id", "success", "timestamp"]
        );

        let metadata = &json["analysis"]["metadata"];
        assert_eq!(metadata["width"], 10);
        assert_eq!(metadata["format"], "PNG");
        assert_eq!(metadata["processing_time"], 1.5);
        assert_eq!(metadata["api_provider"], "openai");
    }

    #[test]
    fn test_batch_field_names_and_counts() {
        let batch = BatchEnvelope::from_results(
            vec![
                ProcessingEnvelope::success("openai", result()),
                ProcessingEnvelope::failure("openai", "File not found: x"),
            ],
            Duration::from_secs(2),
        );
        assert_eq!((batch.total_images, batch.successful, batch.failed), (2, 1, 1));
        assert!(!batch.all_succeeded());

        let mut tampered = BatchEnvelope::from_results(
            vec![ProcessingEnvelope::success("openai", result())],
            Duration::from_secs(1),
        );
        assert!(tampered.all_succeeded());
        tampered.results[0].error = Some("late failure".to_string());
        assert!(!tampered.all_succeeded());

        let json = serde_json::to_value(&batch).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["failed", "processing_time", "results", "successful", "total_images"]
        );
    }

    #[test]
    fn test_envelopes_are_consistent_and_unique() {
        let ok = ProcessingEnvelope::success("openai", result());
        let failed = ProcessingEnvelope::failure("openai", "");
        assert!(ok.is_consistent());
        assert!(failed.is_consistent());
        assert_eq!(failed.error.as_deref(), Some("Unknown error"));
        assert_ne!(ok.request_id, failed.request_id);
        assert!(ok.timestamp > 1_600_000_000.0);
    }
}
