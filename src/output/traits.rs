//! Output sink trait and error types
//!
//! A sink receives the finished, ordered record list of a run exactly once.
//! Aborted runs never reach it.

use crate::catalogue::CourseRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid output name: {0}")]
    InvalidName(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for the completed course catalogue
pub trait OutputSink: Send + Sync {
    /// Persists all records under `output_id`
    ///
    /// Must either store the complete list or fail; a partial write is never
    /// reported as success.
    ///
    /// # Returns
    ///
    /// A human-readable location of the stored records
    fn write(&self, records: &[CourseRecord], output_id: &str) -> OutputResult<String>;
}
