//! Error types for image operations.

use thiserror::Error;

/// Result type for image operations.
pub type ImageResult<T> = Result<T, ImageError>;

/// Broad classification of an [`ImageError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageErrorKind {
    /// The source could not be reached, read or decoded into bytes.
    SourceLoad,
    /// The bytes were loaded but violate size or format constraints.
    Validation,
}

/// Errors that can occur while loading and normalizing images.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Transport failure while fetching a remote image.
    #[error("Failed to load image from URL: {0}")]
    UrlFetch(String),

    /// Remote host answered with a non-success status.
    #[error("HTTP error loading image: {0}")]
    HttpStatus(u16),

    /// Remote resource is not declared as an image.
    #[error("URL does not point to an image: {0}")]
    NotAnImage(String),

    /// Inline payload is not valid base64.
    #[error("Failed to decode base64 image data: {0}")]
    InvalidBase64(String),

    /// Inline payload decoded to nothing.
    #[error("Failed to decode base64 image data: empty payload")]
    EmptyPayload,

    /// Path traversal attempt detected.
    #[error("Invalid file path: {0}")]
    PathTraversal(String),

    /// File does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Path exists but is not a regular file.
    #[error("Path is not a file: {0}")]
    NotAFile(String),

    /// I/O error while reading a file.
    #[error("Failed to load image from file: {0}")]
    Io(#[from] std::io::Error),

    /// Payload exceeds the configured size limit.
    #[error("Image size {size_mb:.2}MB exceeds maximum allowed size {max_mb}MB")]
    TooLarge { size_mb: f64, max_mb: f64 },

    /// Image format is not supported.
    #[error("Unsupported image format: {0}. Supported formats: JPEG, PNG, WEBP, GIF, BMP, TIFF")]
    FormatNotSupported(String),

    /// Codec failed to decode the payload.
    #[error("Failed to process image: {0}")]
    Decode(String),

    /// Codec failed to encode the bitmap.
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

impl ImageError {
    /// Which stage of ingestion this error belongs to.
    pub fn kind(&self) -> ImageErrorKind {
        match self {
            ImageError::UrlFetch(_)
            | ImageError::HttpStatus(_)
            | ImageError::NotAnImage(_)
            | ImageError::InvalidBase64(_)
            | ImageError::EmptyPayload
            | ImageError::PathTraversal(_)
            | ImageError::FileNotFound(_)
            | ImageError::NotAFile(_)
            | ImageError::Io(_) => ImageErrorKind::SourceLoad,
            ImageError::TooLarge { .. }
            | ImageError::FormatNotSupported(_)
            | ImageError::Decode(_)
            | ImageError::Encode(_) => ImageErrorKind::Validation,
        }
    }
}

impl From<image::ImageError> for ImageError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(e) => ImageError::FormatNotSupported(e.to_string()),
            other => ImageError::Decode(other.to_string()),
        }
    }
}
