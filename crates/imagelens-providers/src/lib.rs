//! Vision provider abstraction and integration
//!
//! Every backend implements [`VisionProvider`]. The pipeline only sees the
//! trait, so adding a backend never touches ingestion code.

pub mod capabilities;
pub mod coercion;
pub mod error;
pub mod factory;
pub mod models;
pub mod provider;
pub mod providers;

pub use capabilities::{api_capabilities, capability_for, supported_apis, ProviderLimits};
pub use error::{ProviderError, Result};
pub use factory::{DefaultProviderFactory, ProviderFactory};
pub use models::{
    AnalysisKind, ApiCapability, BoundingBox, DetectedObject, ExtractedText, ImageAnalysis,
    ProviderAvailability, ProviderStatus,
};
pub use provider::VisionProvider;
pub use providers::{OpenAiVisionProvider, PlaceholderProvider};
