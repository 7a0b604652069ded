//! Validation and normalization of raw image bytes.

use image::{imageops::FilterType, ColorType};
use tracing::{debug, info};

use crate::error::{ImageError, ImageResult};
use crate::formats::ImageFormat;
use crate::models::{ImageMetadata, NormalizedImage};
use crate::source::RawImageBytes;

/// Largest width or height kept without downscaling.
pub const MAX_DIMENSION: u32 = 2048;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Checks size and format, decodes, and downscales oversized bitmaps.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNormalizer {
    max_size_mb: f64,
    auto_resize: bool,
    max_dimension: u32,
}

impl ImageNormalizer {
    /// Normalizer enforcing `max_size_mb`, with auto-resize enabled.
    pub fn new(max_size_mb: f64) -> Self {
        Self {
            max_size_mb,
            auto_resize: true,
            max_dimension: MAX_DIMENSION,
        }
    }

    /// Enable or disable downscaling.
    pub fn with_auto_resize(mut self, auto_resize: bool) -> Self {
        self.auto_resize = auto_resize;
        self
    }

    /// Configured size limit in MB.
    pub fn max_size_mb(&self) -> f64 {
        self.max_size_mb
    }

    /// Validate and decode `raw`.
    ///
    /// The size check runs before any decoding is attempted.
    pub fn normalize(&self, raw: RawImageBytes) -> ImageResult<NormalizedImage> {
        check_size(raw.len(), self.max_size_mb)?;

        let format = ImageFormat::detect(&raw.data)?;
        let image = image::load_from_memory_with_format(&raw.data, format.to_codec())?;

        let mut metadata = ImageMetadata {
            width: image.width(),
            height: image.height(),
            format,
            mode: color_mode(image.color()).to_string(),
            size_bytes: raw.len() as u64,
            resized: false,
            original_size: None,
        };
        debug!(
            width = metadata.width,
            height = metadata.height,
            format = %format,
            source = raw.kind.as_str(),
            "Image decoded"
        );

        let image = match scaled_dimensions(image.width(), image.height(), self.max_dimension) {
            Some((width, height)) if self.auto_resize => {
                info!(
                    from = ?metadata.dimensions(),
                    to = ?(width, height),
                    "Downscaling oversized image"
                );
                let resized = image.resize_exact(width, height, FilterType::Lanczos3);
                metadata.original_size = Some([metadata.width, metadata.height]);
                metadata.resized = true;
                metadata.width = resized.width();
                metadata.height = resized.height();
                resized
            }
            _ => image,
        };

        Ok(NormalizedImage { image, metadata })
    }
}

/// Reject payloads larger than `max_size_mb`.
pub fn check_size(len: usize, max_size_mb: f64) -> ImageResult<()> {
    let size_mb = len as f64 / BYTES_PER_MB;
    if size_mb > max_size_mb {
        return Err(ImageError::TooLarge {
            size_mb,
            max_mb: max_size_mb,
        });
    }
    Ok(())
}

/// Target size when either side exceeds `max_dimension`, else `None`.
///
/// The larger side becomes exactly `max_dimension`; the other keeps the
/// aspect ratio, rounded, and never drops below one pixel.
pub fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> Option<(u32, u32)> {
    if width <= max_dimension && height <= max_dimension {
        return None;
    }

    let scale = |side: u32, longest: u32| -> u32 {
        let scaled = (side as f64 * max_dimension as f64 / longest as f64).round() as u32;
        scaled.clamp(1, max_dimension)
    };

    if width >= height {
        Some((max_dimension, scale(height, width)))
    } else {
        Some((scale(width, height), max_dimension))
    }
}

/// Short colour-mode label for a decoded bitmap.
pub fn color_mode(color: ColorType) -> &'static str {
    match (color.has_color(), color.has_alpha()) {
        (false, false) => "L",
        (false, true) => "LA",
        (true, false) => "RGB",
        (true, true) => "RGBA",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::DynamicImage;

    use super::*;
    use crate::source::SourceKind;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::new_rgb8(width, height);
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_small_image_untouched() {
        let normalizer = ImageNormalizer::new(10.0);
        let raw = RawImageBytes::new(png_bytes(64, 32), SourceKind::File);
        let size = raw.len() as u64;

        let normalized = normalizer.normalize(raw).unwrap();
        assert_eq!(normalized.metadata.dimensions(), (64, 32));
        assert_eq!(normalized.metadata.format, ImageFormat::Png);
        assert_eq!(normalized.metadata.mode, "RGB");
        assert_eq!(normalized.metadata.size_bytes, size);
        assert!(!normalized.metadata.resized);
        assert_eq!(normalized.metadata.original_size, None);
    }

    #[test]
    fn test_oversized_image_downscaled() {
        let normalizer = ImageNormalizer::new(10.0);
        let raw = RawImageBytes::new(png_bytes(4096, 1000), SourceKind::Base64);

        let normalized = normalizer.normalize(raw).unwrap();
        assert!(normalized.metadata.resized);
        assert_eq!(normalized.metadata.original_size, Some([4096, 1000]));
        assert_eq!(normalized.metadata.dimensions(), (2048, 500));
        assert_eq!((normalized.image.width(), normalized.image.height()), (2048, 500));
    }

    #[test]
    fn test_resize_can_be_disabled() {
        let normalizer = ImageNormalizer::new(10.0).with_auto_resize(false);
        let raw = RawImageBytes::new(png_bytes(3000, 10), SourceKind::File);

        let normalized = normalizer.normalize(raw).unwrap();
        assert!(!normalized.metadata.resized);
        assert_eq!(normalized.metadata.width, 3000);
    }

    #[test]
    fn test_size_limit_checked_before_decode() {
        let normalizer = ImageNormalizer::new(1.0);
        // Not an image at all; the size check must fire first
        let raw = RawImageBytes::new(vec![0u8; 2 * 1024 * 1024], SourceKind::Url);

        let err = normalizer.normalize(raw).unwrap_err();
        assert!(matches!(err, ImageError::TooLarge { .. }));
    }

    #[test]
    fn test_garbage_is_validation_error() {
        let normalizer = ImageNormalizer::new(10.0);
        let raw = RawImageBytes::new(b"definitely not an image".to_vec(), SourceKind::Base64);

        let err = normalizer.normalize(raw).unwrap_err();
        assert_eq!(err.kind(), crate::ImageErrorKind::Validation);
    }

    #[test]
    fn test_scaled_dimensions() {
        assert_eq!(scaled_dimensions(2048, 2048, 2048), None);
        assert_eq!(scaled_dimensions(3000, 3000, 2048), Some((2048, 2048)));
        assert_eq!(scaled_dimensions(1000, 4096, 2048), Some((500, 2048)));
        assert_eq!(scaled_dimensions(100_000, 1, 2048), Some((2048, 1)));
    }

    #[test]
    fn test_color_modes() {
        assert_eq!(color_mode(ColorType::L8), "L");
        assert_eq!(color_mode(ColorType::La8), "LA");
        assert_eq!(color_mode(ColorType::Rgb8), "RGB");
        assert_eq!(color_mode(ColorType::Rgba16), "RGBA");
    }
}
