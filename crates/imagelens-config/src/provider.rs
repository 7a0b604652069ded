//! Vision provider identity

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Vision-analysis backends known to imagelens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI GPT-4o vision (reference implementation)
    #[default]
    OpenAi,
    /// Anthropic vision models
    Anthropic,
    /// Google Vision API
    Google,
    /// Azure Computer Vision
    Azure,
}

impl ProviderKind {
    /// Every provider, in declaration order.
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Google,
        ProviderKind::Azure,
    ];

    /// Wire name used in envelopes and settings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
            ProviderKind::Azure => "azure",
        }
    }

    /// Human-readable name used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Google => "Google",
            ProviderKind::Azure => "Azure",
        }
    }

    /// One-line description shown in provider listings.
    pub fn description(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI GPT-4 Vision - Advanced image analysis and description",
            ProviderKind::Anthropic => "Anthropic Vision - Detailed image understanding",
            ProviderKind::Google => "Google Vision API - OCR, object detection, and more",
            ProviderKind::Azure => "Azure Computer Vision - Comprehensive image analysis",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "google" => Ok(ProviderKind::Google),
            "azure" => Ok(ProviderKind::Azure),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(" azure ".parse::<ProviderKind>().unwrap(), ProviderKind::Azure);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "mistral".parse::<ProviderKind>().unwrap_err();
        assert!(err.to_string().contains("mistral"));
    }

    #[test]
    fn test_wire_names_round_trip() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        #[derive(Serialize)]
        struct Wrapper {
            provider: ProviderKind,
        }
        let rendered = toml::to_string(&Wrapper {
            provider: ProviderKind::OpenAi,
        })
        .unwrap();
        assert_eq!(rendered.trim(), "provider = \"openai\"");
    }
}
