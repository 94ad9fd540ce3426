//! Two-tier page resolution
//!
//! [`FallbackFetcher`] tries a cheap fetcher first and only pays for the
//! expensive one when a [`FallbackPolicy`] rejects the cheap result.

use crate::catalogue::{FetchFailure, FetchResult, FetchTarget};
use crate::scrape::fetcher::Fetcher;
use async_trait::async_trait;

/// Decides whether HTML from the primary tier is good enough to use
pub trait FallbackPolicy: Send + Sync {
    fn accepts(&self, html: &str, target: &FetchTarget) -> bool;
}

/// Accepts a page only if its markup already contains the link keyword
///
/// A script-generated listing is served as a shell page that fetches fine
/// but has no course links yet; this rejects it.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordPresence;

impl FallbackPolicy for KeywordPresence {
    fn accepts(&self, html: &str, target: &FetchTarget) -> bool {
        html.contains(target.link_keyword.as_str())
    }
}

/// Composes a primary and a secondary fetcher
pub struct FallbackFetcher<P, S, Pol = KeywordPresence> {
    primary: P,
    secondary: S,
    policy: Pol,
}

impl<P: Fetcher, S: Fetcher> FallbackFetcher<P, S> {
    /// Falls back when the primary result lacks the link keyword
    pub fn new(primary: P, secondary: S) -> Self {
        Self::with_policy(primary, secondary, KeywordPresence)
    }
}

impl<P: Fetcher, S: Fetcher, Pol: FallbackPolicy> FallbackFetcher<P, S, Pol> {
    pub fn with_policy(primary: P, secondary: S, policy: Pol) -> Self {
        Self {
            primary,
            secondary,
            policy,
        }
    }

    /// Runs the primary tier and applies the policy to its result
    async fn try_primary(&self, target: &FetchTarget) -> Result<String, FetchFailure> {
        match self.primary.fetch(target).await {
            FetchResult::Html(html) if self.policy.accepts(&html, target) => Ok(html),
            FetchResult::Html(_) => Err(FetchFailure::MissingKeyword),
            FetchResult::Failure(failure) => Err(failure),
        }
    }
}

#[async_trait]
impl<P, S, Pol> Fetcher for FallbackFetcher<P, S, Pol>
where
    P: Fetcher,
    S: Fetcher,
    Pol: FallbackPolicy,
{
    async fn fetch(&self, target: &FetchTarget) -> FetchResult {
        match self.try_primary(target).await {
            Ok(html) => {
                tracing::debug!("Using {} result for {}", self.primary.tier(), target.url);
                return FetchResult::Html(html);
            }
            Err(reason) => tracing::info!(
                "{} fetch of {} unusable ({}), trying {} fetch",
                self.primary.tier(),
                target.url,
                reason,
                self.secondary.tier()
            ),
        }

        self.secondary.fetch(target).await
    }

    fn tier(&self) -> &'static str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Returns a canned result and records the selectors it was asked to wait for
    struct CannedFetcher {
        result: FetchResult,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl CannedFetcher {
        fn new(result: FetchResult) -> (Self, Arc<Mutex<Vec<String>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    result,
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl Fetcher for CannedFetcher {
        async fn fetch(&self, target: &FetchTarget) -> FetchResult {
            self.calls.lock().unwrap().push(target.wait_selector());
            self.result.clone()
        }

        fn tier(&self) -> &'static str {
            "canned"
        }
    }

    fn target() -> FetchTarget {
        FetchTarget::new("https://u.ac.uk/postgraduate/taught/", "/postgraduate/taught/")
    }

    #[test]
    fn test_keyword_presence() {
        let policy = KeywordPresence;
        assert!(policy.accepts(r#"<a href="/postgraduate/taught/ma-x">MA</a>"#, &target()));
        assert!(!policy.accepts("<div id=\"app\"></div>", &target()));
    }

    #[tokio::test]
    async fn test_primary_with_keyword_skips_secondary() {
        let html = r#"<a href="/postgraduate/taught/ma-x">MA X</a>"#.to_string();
        let (primary, primary_calls) = CannedFetcher::new(FetchResult::Html(html.clone()));
        let (secondary, secondary_calls) =
            CannedFetcher::new(FetchResult::Failure(FetchFailure::Timeout));

        let fetcher = FallbackFetcher::new(primary, secondary);
        let result = fetcher.fetch(&target()).await;

        assert_eq!(result, FetchResult::Html(html));
        assert_eq!(primary_calls.lock().unwrap().len(), 1);
        assert!(secondary_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shell_page_triggers_secondary_with_selector() {
        let (primary, _) = CannedFetcher::new(FetchResult::Html("<div id=\"app\"></div>".into()));
        let rendered = r#"<a href="/postgraduate/taught/ma-x">MA X</a>"#.to_string();
        let (secondary, secondary_calls) = CannedFetcher::new(FetchResult::Html(rendered.clone()));

        let fetcher = FallbackFetcher::new(primary, secondary);
        let result = fetcher.fetch(&target()).await;

        assert_eq!(result, FetchResult::Html(rendered));
        assert_eq!(
            *secondary_calls.lock().unwrap(),
            vec![r#"a[href*="/postgraduate/taught/"]"#.to_string()]
        );
    }

    #[tokio::test]
    async fn test_primary_failure_triggers_secondary() {
        let (primary, _) = CannedFetcher::new(FetchResult::Failure(FetchFailure::Status(503)));
        let (secondary, secondary_calls) =
            CannedFetcher::new(FetchResult::Html("/postgraduate/taught/".into()));

        let fetcher = FallbackFetcher::new(primary, secondary);
        assert!(fetcher.fetch(&target()).await.is_html());
        assert_eq!(secondary_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_both_tiers_fail() {
        let (primary, _) = CannedFetcher::new(FetchResult::Failure(FetchFailure::Timeout));
        let (secondary, _) =
            CannedFetcher::new(FetchResult::Failure(FetchFailure::Browser("no driver".into())));

        let fetcher = FallbackFetcher::new(primary, secondary);
        let result = fetcher.fetch(&target()).await;

        assert_eq!(
            result,
            FetchResult::Failure(FetchFailure::Browser("no driver".into()))
        );
    }
}
