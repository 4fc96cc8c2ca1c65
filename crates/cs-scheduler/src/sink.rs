//! Append-only text sink for completed trial records.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use cs_types::{ResultRecord, SinkError};

/// Writes one formatted record line per completed trial.
///
/// The file is opened fresh for every append and closed right after,
/// so a crash mid-run leaves every already-completed trial on disk.
/// Records land in completion order, not trial order.
#[derive(Debug, Clone)]
pub struct ResultSink {
    path: PathBuf,
}

impl ResultSink {
    /// No file is created until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &ResultRecord) -> Result<(), SinkError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SinkError::Append {
                path: self.path.display().to_string(),
                source,
            })?;
        writeln!(file, "{}", record.to_line()).map_err(|source| SinkError::Append {
            path: self.path.display().to_string(),
            source,
        })
    }
}
