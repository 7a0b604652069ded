//! Data models for analysis results and provider descriptors

use std::fmt;
use std::str::FromStr;

use imagelens_config::ProviderKind;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Kind of analysis requested from a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    /// Free-text description
    Description,
    /// Object detection
    Objects,
    /// Text extraction
    Text,
    /// Description, text and objects in one result
    #[default]
    Comprehensive,
}

impl AnalysisKind {
    /// Every analysis kind.
    pub const ALL: [AnalysisKind; 4] = [
        AnalysisKind::Description,
        AnalysisKind::Objects,
        AnalysisKind::Text,
        AnalysisKind::Comprehensive,
    ];

    /// Lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Description => "description",
            AnalysisKind::Objects => "objects",
            AnalysisKind::Text => "text",
            AnalysisKind::Comprehensive => "comprehensive",
        }
    }

    /// Whether a description is part of this kind.
    pub fn wants_description(&self) -> bool {
        matches!(self, AnalysisKind::Description | AnalysisKind::Comprehensive)
    }

    /// Whether extracted text is part of this kind.
    pub fn wants_text(&self) -> bool {
        matches!(self, AnalysisKind::Text | AnalysisKind::Comprehensive)
    }

    /// Whether detected objects are part of this kind.
    pub fn wants_objects(&self) -> bool {
        matches!(self, AnalysisKind::Objects | AnalysisKind::Comprehensive)
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AnalysisKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ProviderError::Configuration(format!(
                    "Unknown analysis type: {}. Expected one of: description, objects, text, comprehensive",
                    wanted
                ))
            })
    }
}

/// Bounding box coordinates for detected objects or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X coordinate of top-left corner
    pub x: f64,
    /// Y coordinate of top-left corner
    pub y: f64,
    /// Width of the box
    pub width: f64,
    /// Height of the box
    pub height: f64,
}

/// Detected object in an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Name of the detected object
    pub name: String,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    /// Object location, when the provider reports one
    pub bounding_box: Option<BoundingBox>,
    /// Additional provider-specific attributes
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl DetectedObject {
    /// Object with a name and confidence only.
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence: confidence.clamp(0.0, 1.0),
            bounding_box: None,
            attributes: serde_json::Map::new(),
        }
    }
}

/// Text extracted from an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Extracted text content
    pub content: String,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    /// Text location, when the provider reports one
    pub bounding_box: Option<BoundingBox>,
    /// Detected language
    pub language: Option<String>,
}

impl ExtractedText {
    /// Text record with content and confidence only.
    pub fn new(content: impl Into<String>, confidence: f64) -> Self {
        Self {
            content: content.into(),
            confidence: confidence.clamp(0.0, 1.0),
            bounding_box: None,
            language: None,
        }
    }
}

/// What a provider returns for one analysis request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// Image description, or the raw answer to a custom prompt
    pub description: Option<String>,
    /// Detected objects
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
    /// Extracted text
    #[serde(default)]
    pub text: Vec<ExtractedText>,
}

/// Static capability descriptor for a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCapability {
    /// Provider identity
    pub provider: ProviderKind,
    /// Supports image description
    pub supports_description: bool,
    /// Supports object detection
    pub supports_objects: bool,
    /// Supports text extraction
    pub supports_text: bool,
    /// Supports face detection
    pub supports_faces: bool,
    /// Supports landmark detection
    pub supports_landmarks: bool,
    /// Maximum image size in MB
    pub max_image_size_mb: f64,
    /// Supported image formats
    pub supported_formats: Vec<String>,
    /// Rate limit per minute
    pub rate_limit_per_minute: Option<u32>,
}

/// Whether a provider can be used with the current settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderAvailability {
    /// A credential is configured
    Available,
    /// No credential is configured
    NoApiKey,
}

/// Provider status entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderStatus {
    /// Provider identity
    pub provider: ProviderKind,
    /// Availability under the current settings
    pub status: ProviderAvailability,
    /// One-line description
    pub description: String,
}
