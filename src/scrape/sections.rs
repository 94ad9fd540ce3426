//! Section lookup on course pages
//!
//! Course pages mark their content blocks with ids such as
//! `entry-requirements` or `fees-and-funding`. A [`SectionFinder`] picks the
//! first element of a given kind whose id matches a case-insensitive pattern.

use regex::{Regex, RegexBuilder};
use scraper::{Html, Selector};

/// Element kind searched when none is given
pub const DEFAULT_SECTION_ELEMENT: &str = "section";

/// Finds one section by matching its `id` attribute against a pattern
#[derive(Debug, Clone)]
pub struct SectionFinder {
    element: String,
    pattern: Regex,
}

impl SectionFinder {
    /// Creates a finder over `<section>` elements
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Self::with_element(pattern, DEFAULT_SECTION_ELEMENT)
    }

    /// Creates a finder over elements named `element`
    pub fn with_element(pattern: &str, element: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            element: element.to_string(),
            pattern,
        })
    }

    /// Returns the visible text of the first matching element
    ///
    /// Text nodes are whitespace-normalized and joined by single spaces.
    /// A matching element without text yields `Some("")`.
    pub fn find(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse(&format!("{}[id]", self.element)).ok()?;

        document
            .select(&selector)
            .find(|element| {
                element
                    .value()
                    .id()
                    .is_some_and(|id| self.pattern.is_match(id))
            })
            .map(|element| {
                element
                    .text()
                    .flat_map(str::split_whitespace)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
    }
}
