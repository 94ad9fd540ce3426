//! HTTP fetcher implementation
//!
//! This module handles the cheap tier of page resolution:
//! - Building HTTP clients with a browser-like user agent and bounded timeout
//! - A single GET per page, redirects followed
//! - Classifying every failure as a [`FetchFailure`] value
//!
//! It also defines the [`Fetcher`] capability shared by every tier.

use crate::catalogue::{FetchFailure, FetchResult, FetchTarget};
use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Upper bound on TCP/TLS connection setup, independent of the request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A way of resolving a page to HTML
///
/// Implementations never return errors: every failure is reported as
/// [`FetchResult::Failure`] so callers can decide whether to fall back.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Resolves the target page
    async fn fetch(&self, target: &FetchTarget) -> FetchResult;

    /// Short name of this tier, for logs
    fn tier(&self) -> &'static str;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - Fetch configuration (user agent)
/// * `timeout` - Total time allowed for one request, body included
///
/// # Example
///
/// ```no_run
/// use course_harvest::config::FetchConfig;
/// use course_harvest::scrape::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&FetchConfig::default(), Duration::from_secs(12)).unwrap();
/// ```
pub fn build_http_client(
    config: &FetchConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and accepts only successful HTML responses
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with `text/html` content type | `Html(body)` |
/// | Non-2xx status | `Failure(Status)` |
/// | Other content type | `Failure(NotHtml)` |
/// | Timeout (connect, headers or body) | `Failure(Timeout)` |
/// | Any other transport error | `Failure(Network)` |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Static fetch error for {}: {}", url, e);
            return FetchResult::Failure(classify_error(&e));
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("Static fetch of {} returned HTTP {}", url, status);
        return FetchResult::Failure(FetchFailure::Status(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("text/html") {
        tracing::debug!("Static fetch of {} is not HTML: {:?}", url, content_type);
        return FetchResult::Failure(FetchFailure::NotHtml(content_type));
    }

    match response.text().await {
        Ok(body) => FetchResult::Html(body),
        Err(e) => {
            tracing::warn!("Static fetch of {} failed reading body: {}", url, e);
            FetchResult::Failure(classify_error(&e))
        }
    }
}

/// Maps a transport error onto the failure taxonomy
fn classify_error(error: &reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else {
        FetchFailure::Network(error.to_string())
    }
}

/// Plain HTTP GET tier: no script execution
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    client: Client,
}

impl StaticFetcher {
    /// Creates a static fetcher using the listing-page timeout
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.static_timeout_secs);
        Ok(Self::with_client(build_http_client(config, timeout)?))
    }

    /// Creates a static fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Performs the single bounded GET
    pub async fn fetch_static(&self, url: &str) -> FetchResult {
        let result = fetch_url(&self.client, url).await;
        if result.is_html() {
            tracing::info!("Fetched {} with a plain GET", url);
        }
        result
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, target: &FetchTarget) -> FetchResult {
        self.fetch_static(&target.url).await
    }

    fn tier(&self) -> &'static str {
        "static"
    }
}
