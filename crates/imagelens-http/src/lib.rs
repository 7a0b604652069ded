//! HTTP plumbing for imagelens
//!
//! Provides the client used to fetch remote images and call vision providers,
//! plus the retry policy wrapped around provider calls.
//!
//! `HttpClientTrait` is the seam tests mock. `RetryMiddleware` retries with
//! clamped exponential backoff and hands back the last error it saw.

pub mod client;
pub mod config;
pub mod error;
pub mod middleware;

pub use client::{HttpClient, HttpClientTrait};
pub use config::{HttpConfig, IMAGE_REDIRECT_LIMIT};
pub use error::{HttpError, Result};
pub use middleware::{RetryConfig, RetryMiddleware, Retryable};

pub use reqwest::{header, Response, StatusCode};
