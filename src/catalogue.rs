//! Data model for a scrape run
//!
//! Everything a run produces or passes between components lives here:
//! fetch results, discovered course links, enrichment details, the persisted
//! course records and the final run outcome.

use crate::output::CatalogueStatistics;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result of resolving a URL to HTML
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The page body, as served or as rendered by the browser
    Html(String),

    /// The fetch did not produce usable HTML
    Failure(FetchFailure),
}

impl FetchResult {
    /// Returns true if this result carries HTML
    pub fn is_html(&self) -> bool {
        matches!(self, Self::Html(_))
    }
}

/// Why a fetch produced no usable HTML
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("content type is not HTML: {0:?}")]
    NotHtml(String),

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("page does not contain the link keyword")]
    MissingKeyword,
}

/// The page a fetcher is asked to resolve, with the keyword that marks its content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    /// URL of the listing page
    pub url: String,

    /// Substring identifying course links on the page
    pub link_keyword: String,
}

impl FetchTarget {
    /// Creates a new fetch target
    pub fn new(url: impl Into<String>, link_keyword: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            link_keyword: link_keyword.into(),
        }
    }

    /// CSS selector matching any anchor whose href contains the keyword
    ///
    /// Used by the rendered tier as its "content has appeared" condition.
    pub fn wait_selector(&self) -> String {
        let escaped = self.link_keyword.replace('\\', "\\\\").replace('"', "\\\"");
        format!("a[href*=\"{}\"]", escaped)
    }
}

/// A course anchor discovered on the listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseLink {
    /// Whitespace-collapsed anchor text, never empty
    pub title: String,

    /// Absolute course URL, unique within one extraction
    pub url: String,
}

/// Free-text fields taken from a course's own page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseDetails {
    pub eligibility: Option<String>,
    pub fees: Option<String>,
}

impl CourseDetails {
    /// Details with both fields absent
    pub fn empty() -> Self {
        Self::default()
    }
}

/// One entry of the output catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub course_name: String,
    pub course_link: String,
    pub eligibility: Option<String>,
    pub fees: Option<String>,
}

impl CourseRecord {
    /// Merges a discovered link with its enrichment result
    pub fn new(link: CourseLink, details: CourseDetails) -> Self {
        Self {
            course_name: link.title,
            course_link: link.url,
            eligibility: details.eligibility,
            fees: details.fees,
        }
    }
}

/// Why a run ended without writing output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// Neither the static nor the rendered fetch produced the page
    PageUnreachable { reason: FetchFailure },

    /// The page was fetched but no anchor matched the keyword
    ZeroMatches { keyword: String },
}

impl AbortReason {
    /// Name of the run stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            Self::PageUnreachable { .. } => "fetching",
            Self::ZeroMatches { .. } => "extracting",
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageUnreachable { reason } => {
                write!(f, "could not fetch page at all ({})", reason)
            }
            Self::ZeroMatches { keyword } => write!(
                f,
                "zero matches for link keyword {:?}; the keyword is likely outdated",
                keyword
            ),
        }
    }
}

/// Final result of one scrape run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Records were written to `location`
    Completed {
        count: usize,
        location: String,
        statistics: CatalogueStatistics,
    },

    /// The run stopped early and wrote nothing
    Aborted(AbortReason),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Number of records written (zero for aborted runs)
    pub fn record_count(&self) -> usize {
        match self {
            Self::Completed { count, .. } => *count,
            Self::Aborted(_) => 0,
        }
    }
}
