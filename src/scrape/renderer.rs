//! Rendered-browser fetcher
//!
//! The expensive tier: a headless Chrome driven over WebDriver executes the
//! page's scripts and the fetch waits until the course anchors exist in the
//! DOM. Every call opens its own [`BrowserSession`] and closes it before
//! returning, whether the render succeeded, timed out, or failed.

use crate::catalogue::{FetchFailure, FetchResult, FetchTarget};
use crate::config::BrowserConfig;
use crate::scrape::fetcher::Fetcher;
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tokio::time::{timeout, Instant};

/// Builds Chrome capabilities for a headless render
pub fn chrome_capabilities(config: &BrowserConfig) -> Capabilities {
    let mut args = Vec::new();
    if config.headless {
        args.push("--headless".to_string());
    }
    args.push("--disable-gpu".to_string());
    args.push(format!("--window-size={}", config.window_size));

    let mut caps = Capabilities::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

/// One WebDriver session, owned by a single rendered fetch
///
/// Call [`release`](Self::release) on every path. If the session is dropped
/// unreleased (the fetch future was cancelled or panicked), the close is
/// spawned onto the current runtime instead.
pub struct BrowserSession {
    client: Client,
    released: bool,
}

impl BrowserSession {
    /// Starts a fresh browser session, bounded by `limit`
    pub async fn open(config: &BrowserConfig, limit: Duration) -> Result<Self, FetchFailure> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(chrome_capabilities(config));

        match timeout(limit, builder.connect(&config.webdriver_url)).await {
            Ok(Ok(client)) => {
                tracing::debug!("Opened browser session at {}", config.webdriver_url);
                Ok(Self {
                    client,
                    released: false,
                })
            }
            Ok(Err(e)) => Err(FetchFailure::Browser(format!(
                "failed to start session at {}: {}",
                config.webdriver_url, e
            ))),
            Err(_) => Err(FetchFailure::Timeout),
        }
    }

    /// Navigates to `url` and waits for `wait_selector` to match
    ///
    /// Navigation, the element wait and reading the page source together
    /// get `limit`; the rendered source is returned once the element is
    /// present.
    pub async fn render(
        &self,
        url: &str,
        wait_selector: &str,
        limit: Duration,
    ) -> Result<String, FetchFailure> {
        let navigation = async {
            self.client.goto(url).await?;
            self.client
                .wait()
                .at_most(limit)
                .for_element(Locator::Css(wait_selector))
                .await?;
            self.client.source().await
        };

        match timeout(limit, navigation).await {
            Ok(Ok(html)) => Ok(html),
            Ok(Err(CmdError::WaitTimeout)) | Err(_) => Err(FetchFailure::Timeout),
            Ok(Err(e)) => Err(FetchFailure::Browser(e.to_string())),
        }
    }

    /// Terminates the session
    pub async fn release(mut self) {
        self.released = true;
        if let Err(e) = self.client.clone().close().await {
            tracing::warn!("Failed to close browser session: {}", e);
        } else {
            tracing::debug!("Closed browser session");
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        tracing::warn!("Browser session dropped without release, closing in background");
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let client = self.client.clone();
            handle.spawn(async move {
                let _ = client.close().await;
            });
        }
    }
}

/// Headless-browser tier: executes scripts before reading the DOM
#[derive(Debug, Clone)]
pub struct RenderedFetcher {
    config: BrowserConfig,
    timeout: Duration,
}

impl RenderedFetcher {
    /// Creates a rendered fetcher
    ///
    /// # Arguments
    ///
    /// * `config` - WebDriver endpoint and browser options
    /// * `timeout` - Total time for starting the browser and rendering
    pub fn new(config: BrowserConfig, timeout: Duration) -> Self {
        Self { config, timeout }
    }

    /// Renders `url` in a fresh browser and returns the DOM once
    /// `wait_selector` matches
    ///
    /// Opening the session and rendering share one deadline of `timeout`.
    pub async fn fetch_rendered(&self, url: &str, wait_selector: &str) -> FetchResult {
        tracing::info!("Falling back to headless browser for {}", url);
        let deadline = Instant::now() + self.timeout;

        let session = match BrowserSession::open(&self.config, self.timeout).await {
            Ok(session) => session,
            Err(failure) => {
                tracing::error!("Browser fetch failed: {}", failure);
                return FetchResult::Failure(failure);
            }
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        let rendered = session.render(url, wait_selector, remaining).await;
        session.release().await;

        match rendered {
            Ok(html) => {
                tracing::info!("Page rendered by headless browser: {}", url);
                FetchResult::Html(html)
            }
            Err(failure) => {
                tracing::error!("Browser fetch failed for {}: {}", url, failure);
                FetchResult::Failure(failure)
            }
        }
    }
}

#[async_trait]
impl Fetcher for RenderedFetcher {
    async fn fetch(&self, target: &FetchTarget) -> FetchResult {
        self.fetch_rendered(&target.url, &target.wait_selector())
            .await
    }

    fn tier(&self) -> &'static str {
        "rendered"
    }
}
