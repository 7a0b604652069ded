//! Data models for normalized images.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::formats::ImageFormat;

/// Metadata describing a normalized image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Image width in pixels (after any resize)
    pub width: u32,
    /// Image height in pixels (after any resize)
    pub height: u32,
    /// Detected image format
    pub format: ImageFormat,
    /// Colour mode of the decoded bitmap ("L", "LA", "RGB", "RGBA")
    pub mode: String,
    /// Size of the original payload in bytes
    pub size_bytes: u64,
    /// Whether the bitmap was downscaled
    pub resized: bool,
    /// Dimensions before downscaling, as `[width, height]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_size: Option<[u32; 2]>,
}

impl ImageMetadata {
    /// Get the image dimensions as a tuple.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the payload size in MB.
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// A decoded bitmap together with its metadata.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// Canonical in-memory bitmap
    pub image: DynamicImage,
    /// Metadata gathered during normalization
    pub metadata: ImageMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_size_omitted_when_not_resized() {
        let metadata = ImageMetadata {
            width: 10,
            height: 20,
            format: ImageFormat::Png,
            mode: "RGB".to_string(),
            size_bytes: 2 * 1024 * 1024,
            resized: false,
            original_size: None,
        };

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["format"], "PNG");
        assert_eq!(json["resized"], false);
        assert!(json.get("original_size").is_none());
        assert_eq!(metadata.dimensions(), (10, 20));
        assert_eq!(metadata.size_mb(), 2.0);
    }
}
