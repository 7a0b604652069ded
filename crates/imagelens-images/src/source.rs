//! Source classification.
//!
//! Classification is a pure function of the input string: it never touches
//! the network or the filesystem.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Prefix marking an inline image data URL.
pub const DATA_URL_PREFIX: &str = "data:image/";

/// Provenance of raw image bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Fetched over HTTP(S)
    Url,
    /// Decoded from inline base64
    Base64,
    /// Read from the local filesystem
    File,
}

impl SourceKind {
    /// Lowercase provenance tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Url => "url",
            SourceKind::Base64 => "base64",
            SourceKind::File => "file",
        }
    }
}

/// A caller-supplied image reference, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// Absolute URL with a scheme and a host
    Url(&'a str),
    /// Base64 payload, optionally carrying a data-URL prefix
    InlineData(&'a str),
    /// Anything else
    FilePath(&'a str),
}

impl<'a> ImageSource<'a> {
    /// Classify `source`. URL wins over inline data, which wins over file path.
    pub fn classify(source: &'a str) -> Self {
        if is_url(source) {
            ImageSource::Url(source)
        } else if is_inline_data(source) {
            ImageSource::InlineData(source)
        } else {
            ImageSource::FilePath(source)
        }
    }

    /// Provenance tag the resolver will attach to the bytes.
    pub fn kind(&self) -> SourceKind {
        match self {
            ImageSource::Url(_) => SourceKind::Url,
            ImageSource::InlineData(_) => SourceKind::Base64,
            ImageSource::FilePath(_) => SourceKind::File,
        }
    }
}

/// Raw image bytes plus where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImageBytes {
    /// Undecoded payload
    pub data: Vec<u8>,
    /// Provenance
    pub kind: SourceKind,
}

impl RawImageBytes {
    /// Wrap a payload.
    pub fn new(data: Vec<u8>, kind: SourceKind) -> Self {
        Self { data, kind }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// True when the string parses as a URL with both a scheme and a host.
pub fn is_url(source: &str) -> bool {
    match url::Url::parse(source) {
        Ok(url) => !url.scheme().is_empty() && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

/// True for a `data:image/` prefix, or when the text after the first comma
/// (or the whole string) is strict base64 with a non-empty payload.
pub fn is_inline_data(source: &str) -> bool {
    if source.starts_with(DATA_URL_PREFIX) {
        return true;
    }

    let payload = source.split_once(',').map_or(source, |(_, rest)| rest);
    STANDARD
        .decode(payload)
        .map(|decoded| !decoded.is_empty())
        .unwrap_or(false)
}

/// Shorten a source for log output; inline payloads are never logged whole.
pub fn display_source(source: &str) -> String {
    const LIMIT: usize = 64;
    if source.chars().count() <= LIMIT {
        source.to_string()
    } else {
        let head: String = source.chars().take(LIMIT).collect();
        format!("{head}...")
    }
}
