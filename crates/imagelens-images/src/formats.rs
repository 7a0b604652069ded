//! Image format identification.
//!
//! The codec's own format detection is tried first. When it cannot name the
//! format, a best-effort magic-byte sniff picks one in a fixed order and falls
//! back to PNG; that fallback is an approximation, not a guaranteed detector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ImageError, ImageResult};

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageFormat {
    /// JPEG format
    Jpeg,
    /// PNG format
    Png,
    /// WebP format
    WebP,
    /// GIF format
    Gif,
    /// Windows bitmap
    Bmp,
    /// TIFF format
    Tiff,
}

impl ImageFormat {
    /// Every supported format.
    pub const ALL: [ImageFormat; 6] = [
        ImageFormat::Jpeg,
        ImageFormat::Png,
        ImageFormat::WebP,
        ImageFormat::Gif,
        ImageFormat::Bmp,
        ImageFormat::Tiff,
    ];

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
            ImageFormat::WebP => "WEBP",
            ImageFormat::Gif => "GIF",
            ImageFormat::Bmp => "BMP",
            ImageFormat::Tiff => "TIFF",
        }
    }

    /// MIME subtype used in data URLs.
    pub fn mime_subtype(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::WebP => "webp",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tiff",
        }
    }

    /// Map a codec format tag onto the supported set.
    ///
    /// Formats the codec knows but this crate does not accept are returned as
    /// [`ImageError::FormatNotSupported`].
    pub fn from_codec(format: image::ImageFormat) -> ImageResult<Self> {
        match format {
            image::ImageFormat::Jpeg => Ok(ImageFormat::Jpeg),
            image::ImageFormat::Png => Ok(ImageFormat::Png),
            image::ImageFormat::WebP => Ok(ImageFormat::WebP),
            image::ImageFormat::Gif => Ok(ImageFormat::Gif),
            image::ImageFormat::Bmp => Ok(ImageFormat::Bmp),
            image::ImageFormat::Tiff => Ok(ImageFormat::Tiff),
            other => Err(ImageError::FormatNotSupported(
                format!("{:?}", other).to_uppercase(),
            )),
        }
    }

    /// Codec format tag for decoding.
    pub fn to_codec(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::WebP => image::ImageFormat::WebP,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
        }
    }

    /// Sniff magic bytes in priority order: PNG, JPEG, RIFF/WEBP, GIF8.
    ///
    /// Anything else is assumed to be PNG.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"\x89PNG") {
            ImageFormat::Png
        } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
            ImageFormat::Jpeg
        } else if bytes.starts_with(b"RIFF")
            && bytes[..bytes.len().min(12)]
                .windows(4)
                .any(|w| w == b"WEBP")
        {
            ImageFormat::WebP
        } else if bytes.starts_with(b"GIF8") {
            ImageFormat::Gif
        } else {
            ImageFormat::Png
        }
    }

    /// Codec detection first, magic-byte sniff when the codec has no answer.
    pub fn detect(bytes: &[u8]) -> ImageResult<Self> {
        match image::guess_format(bytes) {
            Ok(format) => Self::from_codec(format),
            Err(_) => Ok(Self::sniff(bytes)),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JPEG" | "JPG" => Ok(ImageFormat::Jpeg),
            "PNG" => Ok(ImageFormat::Png),
            "WEBP" => Ok(ImageFormat::WebP),
            "GIF" => Ok(ImageFormat::Gif),
            "BMP" => Ok(ImageFormat::Bmp),
            "TIFF" | "TIF" => Ok(ImageFormat::Tiff),
            other => Err(ImageError::FormatNotSupported(other.to_string())),
        }
    }
}
