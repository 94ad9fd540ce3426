//! Scrape coordinator - main run orchestration logic
//!
//! This module sequences one scrape run:
//! - Resolving the listing page through the fetcher tiers
//! - Extracting course links from it
//! - Enriching each course, one polite request at a time
//! - Handing the finished catalogue to the output sink
//!
//! A run that cannot fetch its page, or finds no course links, ends as an
//! [`Aborted`](RunOutcome::Aborted) outcome and never touches the sink.

use crate::catalogue::{AbortReason, CourseRecord, FetchResult, FetchTarget, RunOutcome};
use crate::config::{Config, TargetConfig};
use crate::output::{CatalogueStatistics, JsonFileSink, OutputSink};
use crate::scrape::enricher::{DetailEnricher, Enricher};
use crate::scrape::fallback::FallbackFetcher;
use crate::scrape::fetcher::{Fetcher, StaticFetcher};
use crate::scrape::parser::extract_course_links;
use crate::scrape::renderer::RenderedFetcher;
use crate::scrape::scheduler::PoliteDelay;
use crate::state::RunState;
use crate::HarvestError;
use std::time::{Duration, Instant};

/// Static GET first, headless browser when the page lacks course links
pub type DefaultFetcher = FallbackFetcher<StaticFetcher, RenderedFetcher>;

/// Coordinator wired from a configuration file
pub type DefaultCoordinator = Coordinator<DefaultFetcher, DetailEnricher, JsonFileSink>;

/// State of one invocation; discarded when the run ends
struct ScrapeRun<'a> {
    target: &'a TargetConfig,
    state: RunState,
    records: Vec<CourseRecord>,
    delay: PoliteDelay,
}

impl<'a> ScrapeRun<'a> {
    fn new(target: &'a TargetConfig, polite_delay: Duration) -> Self {
        Self {
            target,
            state: RunState::Init,
            records: Vec::new(),
            delay: PoliteDelay::new(polite_delay),
        }
    }

    fn transition(&mut self, next: RunState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("Run state {} -> {}", self.state, next);
        self.state = next;
        if next.is_terminal() {
            tracing::debug!("Run for {} finished as {}", self.target.url, next);
        }
        Ok(())
    }

    fn abort(&mut self, reason: AbortReason) -> Result<RunOutcome, HarvestError> {
        self.transition(RunState::Aborted)?;
        tracing::error!(
            "Aborting run for {} while {}: {}",
            self.target.url,
            reason.stage(),
            reason
        );
        Ok(RunOutcome::Aborted(reason))
    }
}

/// Main scrape coordinator
pub struct Coordinator<F, E, O> {
    fetcher: F,
    enricher: E,
    sink: O,
    polite_delay: Duration,
}

impl DefaultCoordinator {
    /// Builds the fetcher tiers, enricher and sink from a configuration
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = FallbackFetcher::new(
            StaticFetcher::new(&config.fetch)?,
            RenderedFetcher::new(
                config.browser.clone(),
                Duration::from_secs(config.fetch.render_timeout_secs),
            ),
        );
        let enricher = DetailEnricher::from_config(&config.fetch, &config.sections)?;
        let sink = JsonFileSink::new(&config.output.data_dir);

        Ok(Self::new(
            fetcher,
            enricher,
            sink,
            Duration::from_millis(config.fetch.polite_delay_ms),
        ))
    }
}

impl<F, E, O> Coordinator<F, E, O>
where
    F: Fetcher,
    E: Enricher,
    O: OutputSink,
{
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Resolves the listing page
    /// * `enricher` - Produces details for each course page
    /// * `sink` - Receives the finished catalogue
    /// * `polite_delay` - Minimum pause between course page requests
    pub fn new(fetcher: F, enricher: E, sink: O, polite_delay: Duration) -> Self {
        Self {
            fetcher,
            enricher,
            sink,
            polite_delay,
        }
    }

    /// Runs one complete scrape of `target`
    ///
    /// # Returns
    ///
    /// * `Ok(RunOutcome::Completed)` - Records were written by the sink
    /// * `Ok(RunOutcome::Aborted)` - The page was unreachable or had no
    ///   course links; nothing was written
    /// * `Err(HarvestError)` - The sink failed to write the catalogue
    pub async fn run(&self, target: &TargetConfig) -> Result<RunOutcome, HarvestError> {
        let mut run = ScrapeRun::new(target, self.polite_delay);
        let start_time = Instant::now();

        run.transition(RunState::Fetching)?;
        tracing::info!("Fetching listing page {}", target.url);
        let fetch_target = FetchTarget::new(&target.url, &target.link_keyword);
        let html = match self.fetcher.fetch(&fetch_target).await {
            FetchResult::Html(html) => html,
            FetchResult::Failure(reason) => {
                return run.abort(AbortReason::PageUnreachable { reason });
            }
        };

        run.transition(RunState::Extracting)?;
        let links = extract_course_links(&html, &target.base_url, &target.link_keyword);
        if links.is_empty() {
            return run.abort(AbortReason::ZeroMatches {
                keyword: target.link_keyword.clone(),
            });
        }
        tracing::info!("Found {} course links", links.len());

        let total = links.len();
        for (index, link) in links.into_iter().enumerate() {
            run.transition(RunState::Enriching { index, total })?;
            run.delay.wait_turn().await;

            tracing::info!("[{}/{}] {}", index + 1, total, link.title);
            let details = self.enricher.enrich(&link.url).await;
            run.delay.finished();

            run.records.push(CourseRecord::new(link, details));
        }

        let location = self.sink.write(&run.records, &target.output_name)?;
        run.transition(RunState::Done)?;

        tracing::info!(
            "Run completed: {} courses in {:?}",
            run.records.len(),
            start_time.elapsed()
        );

        Ok(RunOutcome::Completed {
            count: run.records.len(),
            location,
            statistics: CatalogueStatistics::from_records(&run.records),
        })
    }
}

/// Runs a complete scrape with the components described by `config`
///
/// This is the main entry point for a run. It builds the static and
/// rendered fetchers, the detail enricher and the JSON sink, then drives
/// one run against `config.target`.
pub async fn run_scrape(config: &Config) -> Result<RunOutcome, HarvestError> {
    let coordinator = DefaultCoordinator::from_config(config)?;
    coordinator.run(&config.target).await
}
