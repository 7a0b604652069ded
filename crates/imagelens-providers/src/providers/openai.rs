//! OpenAI vision provider
//!
//! Sends a single-turn chat completion carrying a text instruction and the
//! image as a JPEG data URL. Only the remote call is retried; validation and
//! encoding happen once per request.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use imagelens_config::ProviderKind;
use imagelens_http::{
    HttpClient, HttpClientTrait, HttpConfig, HttpError, RetryConfig, RetryMiddleware, StatusCode,
};
use imagelens_images::{to_data_url, ImageError, ImageFormat, NormalizedImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::capabilities::{capability_for, ProviderLimits};
use crate::coercion;
use crate::error::{ProviderError, Result};
use crate::models::{AnalysisKind, ApiCapability, DetectedObject, ExtractedText, ImageAnalysis};
use crate::provider::VisionProvider;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Vision-capable chat model
pub const MODEL: &str = "gpt-4o";

/// Completion token ceiling per request
pub const MAX_TOKENS: u32 = 16000;

const DESCRIBE_PROMPT: &str = "Please provide a detailed description of this image. Focus on the main subjects, setting, colors, composition, and any notable details.";

const TEXT_PROMPT: &str = "Please extract all visible text from this image. Return the results as a JSON array where each item has 'content' (the text) and 'confidence' (estimated confidence from 0.0 to 1.0). If no text is found, return an empty array.";

const OBJECTS_PROMPT: &str = "Please identify and list all objects, people, animals, and significant items visible in this image. Return the results as a JSON array where each item has 'name' (object name) and 'confidence' (estimated confidence from 0.0 to 1.0). Focus on the most prominent and clearly visible objects.";

/// OpenAI GPT-4o vision provider
pub struct OpenAiVisionProvider {
    api_key: String,
    http: Arc<dyn HttpClientTrait>,
    base_url: String,
    retry: RetryMiddleware,
    limits: ProviderLimits,
}

impl OpenAiVisionProvider {
    /// Create a provider with the given request timeout and attempt budget
    pub fn new(api_key: impl Into<String>, timeout: Duration, max_attempts: u32) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "OpenAI API key is required".to_string(),
            ));
        }

        let http = HttpClient::new(HttpConfig::vision_provider(timeout))
            .map_err(|e| ProviderError::Configuration(e.to_string()))?;

        Ok(Self {
            api_key,
            http: Arc::new(http),
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryMiddleware::new(RetryConfig::with_max_attempts(max_attempts)),
            limits: ProviderLimits::for_provider(ProviderKind::OpenAi),
        })
    }

    /// Point the provider at a different endpoint (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the retry policy
    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry = RetryMiddleware::new(config);
        self
    }

    /// Replace the HTTP client
    pub fn with_client(mut self, http: Arc<dyn HttpClientTrait>) -> Self {
        self.http = http;
        self
    }

    /// Endpoint requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate, encode and send one prompt; returns the raw answer text.
    async fn complete(&self, image: &NormalizedImage, prompt: &str) -> Result<String> {
        self.validate_image(image)?;

        let data_url = to_data_url(&image.image).map_err(|e| match e {
            ImageError::Encode(message) => ProviderError::Encoding(message),
            other => ProviderError::Encoding(other.to_string()),
        })?;
        let body = serde_json::to_value(ChatRequest::vision(prompt, &data_url))
            .map_err(|e| unexpected(e.to_string()))?;
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            "Sending {}x{} image to OpenAI ({} payload bytes)",
            image.metadata.width,
            image.metadata.height,
            data_url.len()
        );

        self.retry.execute(|| self.send(&url, &body)).await
    }

    async fn send(&self, url: &str, body: &serde_json::Value) -> Result<String> {
        let response = self
            .http
            .post_json(url, Some(&self.api_key), body)
            .await
            .map_err(classify)?;

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| unexpected(e.to_string()))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| api("No response from OpenAI API"))?;

        choice
            .message
            .and_then(|m| m.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| api("Empty response from OpenAI API"))
    }
}

impl fmt::Debug for OpenAiVisionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiVisionProvider")
            .field("base_url", &self.base_url)
            .field("retry", self.retry.config())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl VisionProvider for OpenAiVisionProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn supported_analysis_kinds(&self) -> &[AnalysisKind] {
        &AnalysisKind::ALL
    }

    fn max_image_size_mb(&self) -> f64 {
        self.limits.max_size_mb
    }

    fn supported_formats(&self) -> &[ImageFormat] {
        &self.limits.formats
    }

    fn max_dimension(&self) -> Option<u32> {
        Some(self.limits.max_dimension)
    }

    fn capability(&self) -> ApiCapability {
        capability_for(ProviderKind::OpenAi)
    }

    async fn describe(&self, image: &NormalizedImage) -> Result<String> {
        self.complete(image, DESCRIBE_PROMPT).await
    }

    async fn extract_text(&self, image: &NormalizedImage) -> Result<Vec<ExtractedText>> {
        let answer = self.complete(image, TEXT_PROMPT).await?;
        Ok(coercion::parse_text(&answer))
    }

    async fn detect_objects(&self, image: &NormalizedImage) -> Result<Vec<DetectedObject>> {
        let answer = self.complete(image, OBJECTS_PROMPT).await?;
        Ok(coercion::parse_objects(&answer))
    }

    async fn analyze_custom(
        &self,
        image: &NormalizedImage,
        prompt: &str,
    ) -> Result<ImageAnalysis> {
        let answer = self.complete(image, prompt).await?;
        Ok(ImageAnalysis {
            description: Some(answer),
            ..Default::default()
        })
    }
}

/// Map a transport failure onto the provider error classes.
fn classify(err: HttpError) -> ProviderError {
    let provider = ProviderKind::OpenAi.display_name().to_string();

    match err {
        HttpError::HttpStatus { status, message } => {
            error!("OpenAI API error ({}): {}", status, error_detail(&message));
            match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderError::Authentication {
                        provider,
                        message: format!(
                            "invalid or unauthorized API key (HTTP {})",
                            status.as_u16()
                        ),
                    }
                }
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited {
                    provider,
                    message: error_detail(&message),
                },
                _ => ProviderError::Api {
                    provider,
                    message: format!("HTTP {}: {}", status.as_u16(), error_detail(&message)),
                },
            }
        }
        other => ProviderError::Unexpected {
            provider,
            message: other.to_string(),
        },
    }
}

/// Pull `error.message` out of an OpenAI error body, else return the body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn api(message: &str) -> ProviderError {
    ProviderError::Api {
        provider: ProviderKind::OpenAi.display_name().to_string(),
        message: message.to_string(),
    }
}

fn unexpected(message: String) -> ProviderError {
    ProviderError::Unexpected {
        provider: ProviderKind::OpenAi.display_name().to_string(),
        message,
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'static str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

impl<'a> ChatRequest<'a> {
    fn vision(prompt: &'a str, data_url: &'a str) -> Self {
        Self {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}
