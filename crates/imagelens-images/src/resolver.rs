//! Source resolution: turn a classified source into raw bytes.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use imagelens_http::{header, HttpClient, HttpClientTrait, HttpConfig, HttpError};
use tracing::debug;

use crate::error::{ImageError, ImageResult};
use crate::source::{display_source, ImageSource, RawImageBytes, DATA_URL_PREFIX};

/// Fetches raw image bytes from URLs, inline payloads and files.
///
/// Remote fetches follow the HTTP client's limited redirect policy and
/// download the full body; size limits are enforced afterwards by the
/// normalizer.
#[derive(Clone)]
pub struct SourceResolver {
    http: Arc<dyn HttpClientTrait>,
}

impl SourceResolver {
    /// Resolver whose remote fetches time out after `timeout`.
    pub fn new(timeout: Duration) -> ImageResult<Self> {
        let client = HttpClient::new(HttpConfig::image_fetch(timeout))
            .map_err(|e| ImageError::UrlFetch(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Resolver using a caller-provided HTTP client.
    pub fn with_client(http: Arc<dyn HttpClientTrait>) -> Self {
        Self { http }
    }

    /// Classify `source` and load its bytes.
    pub async fn resolve(&self, source: &str) -> ImageResult<RawImageBytes> {
        let classified = ImageSource::classify(source);
        debug!(
            kind = classified.kind().as_str(),
            source = %display_source(source),
            "Resolving image source"
        );

        let data = match classified {
            ImageSource::Url(url) => self.fetch_url(url).await?,
            ImageSource::InlineData(data) => decode_inline(data)?,
            ImageSource::FilePath(path) => read_file(path).await?,
        };

        debug!(bytes = data.len(), "Image source resolved");
        Ok(RawImageBytes::new(data, classified.kind()))
    }

    async fn fetch_url(&self, url: &str) -> ImageResult<Vec<u8>> {
        let response = self.http.get(url).await.map_err(|e| match e {
            HttpError::HttpStatus { status, .. } => ImageError::HttpStatus(status.as_u16()),
            other => ImageError::UrlFetch(other.to_string()),
        })?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(ImageError::NotAnImage(content_type));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ImageError::UrlFetch(e.to_string()))?;
        Ok(body.to_vec())
    }
}

impl std::fmt::Debug for SourceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceResolver").finish_non_exhaustive()
    }
}

/// Decode an inline payload, stripping an optional `data:image/...,` prefix.
pub fn decode_inline(source: &str) -> ImageResult<Vec<u8>> {
    let payload = if source.starts_with(DATA_URL_PREFIX) {
        source.split_once(',').map_or(source, |(_, rest)| rest)
    } else {
        source
    };

    let decoded = STANDARD
        .decode(payload)
        .map_err(|e| ImageError::InvalidBase64(e.to_string()))?;
    if decoded.is_empty() {
        return Err(ImageError::EmptyPayload);
    }
    Ok(decoded)
}

/// Lexically normalize `path`, rejecting it if any `..` segment survives.
///
/// `.` segments are dropped and `name/..` pairs cancel. A `..` directly under
/// the root is dropped, the way the root's parent is the root itself. The
/// check is purely lexical: symlinks are not resolved.
pub fn sanitize_path(path: &str) -> ImageResult<PathBuf> {
    let mut normalized = PathBuf::new();
    let mut depth = 0usize;

    for component in Path::new(path).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    normalized.pop();
                    depth -= 1;
                } else if !normalized.has_root() {
                    return Err(ImageError::PathTraversal(path.to_string()));
                }
            }
            Component::Normal(segment) => {
                normalized.push(segment);
                depth += 1;
            }
        }
    }

    Ok(normalized)
}

async fn read_file(path: &str) -> ImageResult<Vec<u8>> {
    let sanitized = sanitize_path(path)?;

    let metadata = match tokio::fs::metadata(&sanitized).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ImageError::FileNotFound(path.to_string()));
        }
        Err(e) => return Err(ImageError::Io(e)),
    };
    if !metadata.is_file() {
        return Err(ImageError::NotAFile(path.to_string()));
    }

    Ok(tokio::fs::read(&sanitized).await?)
}
