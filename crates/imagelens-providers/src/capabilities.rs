//! Static provider descriptors: capabilities, status and limits

use imagelens_config::{ProviderKind, Settings};
use imagelens_images::ImageFormat;
use serde::Serialize;

use crate::models::{ApiCapability, ProviderAvailability, ProviderStatus};

/// Capability descriptor for `provider`.
///
/// Only the reference backend advertises capabilities; the others are
/// placeholders.
pub fn capability_for(provider: ProviderKind) -> ApiCapability {
    match provider {
        ProviderKind::OpenAi => {
            let limits = ProviderLimits::for_provider(provider);
            ApiCapability {
                provider,
                supports_description: true,
                supports_objects: true,
                supports_text: true,
                supports_faces: false,
                supports_landmarks: false,
                max_image_size_mb: limits.max_size_mb,
                supported_formats: format_names(&limits.formats),
                rate_limit_per_minute: Some(60),
            }
        }
        ProviderKind::Anthropic | ProviderKind::Google | ProviderKind::Azure => ApiCapability {
            provider,
            supports_description: false,
            supports_objects: false,
            supports_text: false,
            supports_faces: false,
            supports_landmarks: false,
            max_image_size_mb: 0.0,
            supported_formats: Vec::new(),
            rate_limit_per_minute: None,
        },
    }
}

/// Capability descriptors for every provider.
pub fn api_capabilities() -> Vec<ApiCapability> {
    ProviderKind::ALL.into_iter().map(capability_for).collect()
}

/// Availability of every provider under `settings`.
pub fn supported_apis(settings: &Settings) -> Vec<ProviderStatus> {
    ProviderKind::ALL
        .into_iter()
        .map(|provider| ProviderStatus {
            provider,
            status: if settings.api_key_for(provider, None).is_some() {
                ProviderAvailability::Available
            } else {
                ProviderAvailability::NoApiKey
            },
            description: provider.description().to_string(),
        })
        .collect()
}

/// Documented upload limits of each backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderLimits {
    /// Largest upload in MB
    pub max_size_mb: f64,
    /// Largest side in pixels
    pub max_dimension: u32,
    /// Accepted formats
    pub formats: Vec<ImageFormat>,
}

impl ProviderLimits {
    /// Limits recorded for `provider`
    pub fn for_provider(provider: ProviderKind) -> Self {
        use ImageFormat::*;

        let (max_size_mb, max_dimension, formats) = match provider {
            ProviderKind::OpenAi => (20.0, 2048, vec![Jpeg, Png, WebP, Gif]),
            ProviderKind::Anthropic => (5.0, 1568, vec![Jpeg, Png, WebP, Gif]),
            ProviderKind::Google => (20.0, 4096, ImageFormat::ALL.to_vec()),
            ProviderKind::Azure => (4.0, 4200, vec![Jpeg, Png, Bmp, Gif]),
        };

        Self {
            max_size_mb,
            max_dimension,
            formats,
        }
    }
}

fn format_names(formats: &[ImageFormat]) -> Vec<String> {
    formats.iter().map(|f| f.as_str().to_string()).collect()
}
