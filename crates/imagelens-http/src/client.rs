//! reqwest-backed client

use async_trait::async_trait;
use reqwest::{redirect::Policy, RequestBuilder, Response};
use tracing::debug;

use crate::{
    config::HttpConfig,
    error::{HttpError, Result},
};

/// Outbound HTTP as seen by the image resolver and the providers.
///
/// Both methods fail with [`HttpError::HttpStatus`] on a non-2xx answer, so
/// callers only ever see successful responses.
#[async_trait]
pub trait HttpClientTrait: Send + Sync {
    async fn get(&self, url: &str) -> Result<Response>;

    /// POST `body` as JSON, with bearer auth when a token is given
    async fn post_json(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<Response>;
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    config: HttpConfig,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let redirects = match config.redirect_limit {
            Some(hops) => Policy::limited(hops),
            None => Policy::none(),
        };

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(redirects)
            .pool_idle_timeout(config.pool_idle_timeout)
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))?;

        Ok(Self { inner, config })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.config.timeout)
            } else {
                HttpError::RequestFailed(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "Request rejected");
        Err(HttpError::HttpStatus { status, message })
    }
}

fn parse_url(url: &str) -> Result<url::Url> {
    url::Url::parse(url).map_err(|e| HttpError::InvalidUrl(format!("{url}: {e}")))
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get(&self, url: &str) -> Result<Response> {
        let url = parse_url(url)?;
        debug!(host = url.host_str().unwrap_or_default(), "GET");
        self.dispatch(self.inner.get(url)).await
    }

    async fn post_json(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<Response> {
        let url = parse_url(url)?;
        debug!(path = url.path(), "POST");

        let mut request = self.inner.post(url).json(body);
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }
        self.dispatch(request).await
    }
}
