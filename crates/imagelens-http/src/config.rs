//! Transport settings for the two kinds of outbound traffic

use std::time::Duration;

const CONNECT_TIMEOUT_CAP: Duration = Duration::from_secs(10);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Redirect hops followed when fetching images
pub const IMAGE_REDIRECT_LIMIT: usize = 10;

/// Settings used to build an [`HttpClient`](crate::HttpClient)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Whole-request deadline
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    /// `None` disables redirects
    pub redirect_limit: Option<usize>,
    pub pool_idle_timeout: Duration,
}

impl HttpConfig {
    fn with_deadline(timeout: Duration, redirect_limit: Option<usize>) -> Self {
        Self {
            timeout,
            connect_timeout: timeout.min(CONNECT_TIMEOUT_CAP),
            user_agent: format!("imagelens/{}", env!("CARGO_PKG_VERSION")),
            redirect_limit,
            pool_idle_timeout: POOL_IDLE_TIMEOUT,
        }
    }

    /// Fetching images from arbitrary hosts; redirects are followed
    pub fn image_fetch(timeout: Duration) -> Self {
        Self::with_deadline(timeout, Some(IMAGE_REDIRECT_LIMIT))
    }

    /// Calling a vision API; a redirect is treated as an error status
    pub fn vision_provider(timeout: Duration) -> Self {
        Self::with_deadline(timeout, None)
    }
}
