//! Course link extraction
//!
//! Turns a listing page into an ordered, deduplicated list of course links.
//! Candidates are anchors whose href contains the link keyword as a plain,
//! case-sensitive substring.

use crate::catalogue::CourseLink;
use crate::url::normalize_href;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Extracts course links from a listing page
///
/// # Extraction Rules
///
/// For each `<a href>` containing `keyword`, in document order:
///
/// 1. Normalize the href: a leading `/` is prefixed with `base_url`
///    (trailing slashes stripped); other relative hrefs are joined onto it
/// 2. Skip it if the normalized URL no longer contains `keyword` or was
///    already accepted in this call
/// 3. Collapse the anchor text; skip it if empty
/// 4. Accept it
///
/// # Arguments
///
/// * `html` - The listing page markup
/// * `base_url` - Site root used for relative hrefs
/// * `keyword` - Substring identifying course links
///
/// # Example
///
/// ```
/// use course_harvest::scrape::extract_course_links;
///
/// let html = r#"<a href="/postgraduate/taught/ma-x">MA X</a>"#;
/// let links = extract_course_links(html, "https://u.ac.uk", "/postgraduate/taught/");
/// assert_eq!(links[0].url, "https://u.ac.uk/postgraduate/taught/ma-x");
/// ```
pub fn extract_course_links(html: &str, base_url: &str, keyword: &str) -> Vec<CourseLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    let candidates: Vec<(ElementRef, &str)> = document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href").map(|href| (element, href)))
        .filter(|(_, href)| href.contains(keyword))
        .collect();
    tracing::debug!("Found {} raw links", candidates.len());

    let mut seen = HashSet::new();
    for (element, href) in candidates {
        let Some(url) = normalize_href(href, base_url) else {
            continue;
        };

        if !url.contains(keyword) || seen.contains(&url) {
            continue;
        }

        let title = collapse_whitespace(&element.text().collect::<String>());
        if title.is_empty() {
            continue;
        }

        seen.insert(url.clone());
        links.push(CourseLink { title, url });
    }

    tracing::debug!("Parsed {} unique course links", links.len());
    links
}

/// Trims and replaces every run of whitespace with a single space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
