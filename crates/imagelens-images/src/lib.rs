//! Image ingestion for imagelens.
//!
//! This crate turns a caller-supplied source string into a validated bitmap:
//! - Source classification (URL, inline base64 / data URL, file path)
//! - Fetching raw bytes from each source kind
//! - Size and format validation with magic-byte fallback
//! - Automatic downscaling of oversized images
//! - JPEG data-URL encoding for provider payloads

pub mod encoding;
pub mod error;
pub mod formats;
pub mod models;
pub mod normalizer;
pub mod resolver;
pub mod source;

pub use encoding::to_data_url;
pub use error::{ImageError, ImageErrorKind, ImageResult};
pub use formats::ImageFormat;
pub use models::{ImageMetadata, NormalizedImage};
pub use normalizer::{ImageNormalizer, MAX_DIMENSION};
pub use resolver::SourceResolver;
pub use source::{ImageSource, RawImageBytes, SourceKind};
