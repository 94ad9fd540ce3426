//! JSON record file output
//!
//! Writes the catalogue as a pretty-printed JSON array into a data
//! directory. The file is written under a temporary name and renamed into
//! place, so the final path only ever holds a complete catalogue.

use crate::catalogue::CourseRecord;
use crate::output::traits::{OutputError, OutputResult, OutputSink};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Writes `<data_dir>/<output_id>` as a JSON array of records
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    data_dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Final path for an output identifier
    pub fn output_path(&self, output_id: &str) -> OutputResult<PathBuf> {
        if output_id.is_empty()
            || output_id == "."
            || output_id == ".."
            || output_id.contains(&['/', '\\'][..])
        {
            return Err(OutputError::InvalidName(output_id.to_string()));
        }
        Ok(self.data_dir.join(output_id))
    }
}

impl OutputSink for JsonFileSink {
    fn write(&self, records: &[CourseRecord], output_id: &str) -> OutputResult<String> {
        let path = self.output_path(output_id)?;
        let json = serde_json::to_string_pretty(records)?;

        fs::create_dir_all(&self.data_dir)?;

        let tmp_path = self.data_dir.join(format!(".{}.tmp", output_id));
        let written = fs::File::create(&tmp_path).and_then(|mut file| {
            file.write_all(json.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&tmp_path, &path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::info!("Saved {} records to {}", records.len(), path.display());
        Ok(path.display().to_string())
    }
}
