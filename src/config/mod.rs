//! Configuration module for Course-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Only the `[target]` table is required; every other table falls back to
//! defaults suited to a single polite run.
//!
//! # Example
//!
//! ```no_run
//! use course_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Scraping {}", config.target.url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BrowserConfig, Config, FetchConfig, OutputConfig, SectionConfig, TargetConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{parse_window_size, validate};
