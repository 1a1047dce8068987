//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests returning the raw body and bare content type
//! - Racing every request against the crawl's cancellation token
//! - Error classification

use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A downloaded body with its content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Raw response body
    pub body: Vec<u8>,

    /// Content-Type without parameters (e.g. `text/html`), empty if absent
    pub content_type: String,
}

/// Fetches raw bytes for a URL
///
/// Implementations must stop promptly once `cancel` fires and must strip
/// parameters such as `charset` from the content type they return.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, url: &Url, cancel: &CancellationToken) -> FetchResult<Download>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use site_mirror::crawler::build_http_client;
///
/// let client = build_http_client("Wget/1.0", Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Strips parameters from a Content-Type header value
///
/// `text/html; charset=utf-8` becomes `text/html`.
pub fn bare_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Downloader backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Creates a downloader with the given per-request timeout and user agent
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, timeout)?,
        })
    }

    async fn fetch(&self, url: &Url) -> FetchResult<Download> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(bare_content_type)
            .unwrap_or_default();

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(url, e))?;

        Ok(Download {
            body: body.to_vec(),
            content_type,
        })
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &Url, cancel: &CancellationToken) -> FetchResult<Download> {
        tokio::select! {
            _ = cancel.cancelled() => Err(FetchError::Cancelled { url: url.to_string() }),
            result = self.fetch(url) => result,
        }
    }
}

/// Maps a reqwest error onto the download error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
