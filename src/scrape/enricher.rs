//! Course detail enrichment
//!
//! Visits one course page and pulls out its eligibility and fee text.
//! Detail pages are assumed to be server-rendered, so this uses a single
//! plain GET and never the browser. Nothing here fails: a page that cannot
//! be fetched yields empty details.

use crate::catalogue::CourseDetails;
use crate::config::{FetchConfig, SectionConfig};
use crate::scrape::fetcher::build_http_client;
use crate::scrape::sections::SectionFinder;
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;

/// Produces the details for one course URL
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Never fails; missing information is reported as absent fields
    async fn enrich(&self, course_url: &str) -> CourseDetails;
}

/// Fetches a course page and extracts its eligibility and fee sections
#[derive(Debug, Clone)]
pub struct DetailEnricher {
    client: Client,
    eligibility: SectionFinder,
    fees: SectionFinder,
}

impl DetailEnricher {
    pub fn new(client: Client, eligibility: SectionFinder, fees: SectionFinder) -> Self {
        Self {
            client,
            eligibility,
            fees,
        }
    }

    /// Builds an enricher with the detail timeout and configured patterns
    pub fn from_config(
        fetch: &FetchConfig,
        sections: &SectionConfig,
    ) -> Result<Self, HarvestError> {
        let timeout = Duration::from_secs(fetch.detail_timeout_secs);
        let client = build_http_client(fetch, timeout)?;
        let eligibility =
            SectionFinder::with_element(&sections.eligibility_pattern, &sections.element)?;
        let fees = SectionFinder::with_element(&sections.fees_pattern, &sections.element)?;
        Ok(Self::new(client, eligibility, fees))
    }

    /// Extracts both fields from course page markup
    pub fn extract_details(&self, html: &str) -> CourseDetails {
        let document = Html::parse_document(html);
        CourseDetails {
            eligibility: self.eligibility.find(&document),
            fees: self.fees.find(&document),
        }
    }

    /// Downloads the page body, whatever its status or content type
    async fn download(&self, course_url: &str) -> Result<String, reqwest::Error> {
        let response = self.client.get(course_url).send().await?;
        tracing::trace!("{} answered HTTP {}", course_url, response.status());
        response.text().await
    }
}

#[async_trait]
impl Enricher for DetailEnricher {
    async fn enrich(&self, course_url: &str) -> CourseDetails {
        match self.download(course_url).await {
            Ok(body) => {
                let details = self.extract_details(&body);
                tracing::debug!(
                    "Details for {}: eligibility={}, fees={}",
                    course_url,
                    details.eligibility.is_some(),
                    details.fees.is_some()
                );
                details
            }
            Err(e) => {
                tracing::warn!("Failed to fetch details for {}: {}", course_url, e);
                CourseDetails::empty()
            }
        }
    }
}
