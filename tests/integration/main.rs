//! Integration tests for Course-Harvest
//!
//! These tests use wiremock to serve listing and course pages and drive
//! complete scrape runs end-to-end. The headless-browser tier is replaced
//! by an in-process fetcher so no WebDriver is needed.

mod scrape_tests;
