//! QC audit record attached to every assembled dataset.
//!
//! Tracks which dates were iterated, which of them had at least one
//! missing or unreadable file, and the full list of failed paths. A
//! missing file never shortens `dates_loaded`; the corresponding slice of
//! the data array stays NaN-filled instead.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Per-load QC annotations shared by all dataset kinds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadAudit {
    /// Every date key iterated, in request order, independent of success
    pub dates_loaded: Vec<String>,

    /// Date keys for which at least one underlying file failed to load.
    ///
    /// This flag is coarse: a date appears here even when the reduction
    /// over its surviving files still produced numbers. Callers must check
    /// NaN-ness per grid point to know whether a value is usable.
    pub dates_with_missing_files: BTreeSet<String>,

    /// Paths that failed to load, in encounter order
    pub missing_files: Vec<PathBuf>,
}

impl LoadAudit {
    /// Create an audit covering the given outer date axis
    pub fn new(dates: &[String]) -> Self {
        Self {
            dates_loaded: dates.to_vec(),
            dates_with_missing_files: BTreeSet::new(),
            missing_files: Vec::new(),
        }
    }

    /// Record one failed file under the given date key
    pub fn record_missing(&mut self, date: &str, file: PathBuf) {
        self.dates_with_missing_files.insert(date.to_string());
        self.missing_files.push(file);
    }

    /// Whether every requested file loaded successfully
    pub fn is_complete(&self) -> bool {
        self.missing_files.is_empty()
    }

    /// Number of dates with at least one missing file
    pub fn missing_date_count(&self) -> usize {
        self.dates_with_missing_files.len()
    }

    /// One-line QC summary for logging
    pub fn summary(&self) -> String {
        format!(
            "{} dates loaded, {} dates with missing files, {} missing files",
            self.dates_loaded.len(),
            self.dates_with_missing_files.len(),
            self.missing_files.len()
        )
    }
}
