//! State module for tracking scrape run progress
//!
//! A run moves `Init -> Fetching -> Extracting -> Enriching(i) -> Done`, with
//! an abort edge out of `Fetching` and `Extracting`. There is no edge back:
//! a failed run ends and the caller starts a new one.

mod run_state;

pub use run_state::RunState;
