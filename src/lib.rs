//! Course-Harvest: a course catalogue extractor
//!
//! This crate fetches a university listing page (falling back to a rendered
//! browser fetch for script-generated pages), discovers course links by
//! keyword, enriches every course with eligibility and fee text taken from
//! its own page, and writes the catalogue as a JSON record file.

pub mod catalogue;
pub mod config;
pub mod output;
pub mod scrape;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Course-Harvest operations
///
/// Fetch failures are not errors: they travel as
/// [`FetchResult::Failure`](catalogue::FetchResult) values and end a run as
/// an [`Aborted`](catalogue::RunOutcome::Aborted) outcome.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid section pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid run state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunState,
        to: state::RunState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid section pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for Course-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalogue::{CourseDetails, CourseLink, CourseRecord, FetchResult, RunOutcome};
pub use config::Config;
pub use state::RunState;
