//! Scrape module for resolving, parsing and enriching course pages
//!
//! This module contains the core scraping logic, including:
//! - Static and browser-rendered page fetching with fallback
//! - Course link extraction from listing pages
//! - Section lookup and detail enrichment of course pages
//! - Polite request pacing and overall run coordination

mod coordinator;
mod enricher;
mod fallback;
mod fetcher;
mod parser;
mod renderer;
mod scheduler;
mod sections;

pub use coordinator::{run_scrape, Coordinator, DefaultCoordinator, DefaultFetcher};
pub use enricher::{DetailEnricher, Enricher};
pub use fallback::{FallbackFetcher, FallbackPolicy, KeywordPresence};
pub use fetcher::{build_http_client, fetch_url, Fetcher, StaticFetcher};
pub use parser::{collapse_whitespace, extract_course_links};
pub use renderer::{chrome_capabilities, BrowserSession, RenderedFetcher};
pub use scheduler::PoliteDelay;
pub use sections::{SectionFinder, DEFAULT_SECTION_ELEMENT};
