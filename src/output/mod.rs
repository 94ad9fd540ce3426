//! Output module for persisting the course catalogue
//!
//! This module handles:
//! - The sink interface the coordinator hands finished runs to
//! - Writing the catalogue as a JSON record file
//! - Summarizing how complete the enrichment was

mod json_output;
pub mod stats;
mod traits;

pub use json_output::JsonFileSink;
pub use stats::{print_statistics, CatalogueStatistics};
pub use traits::{OutputError, OutputResult, OutputSink};
