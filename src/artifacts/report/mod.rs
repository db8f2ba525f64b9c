//! Extraction result reporting
//!
//! The pipeline returns an [`ExtractionReport`] per input file so the
//! front end can render per-entry successes and failures without the core
//! doing any console output itself.

use crate::artifacts::tar::header::EntryKind;
use chrono::DateTime;
use derive_new::new;
use std::path::PathBuf;

/// One materialized output file or directory.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct WrittenEntry {
    /// Path relative to the target directory
    pub path: PathBuf,
    pub bytes: u64,
}

/// One entry that was abandoned, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct EntryFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of running the pipeline over one input stream.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    written: Vec<WrittenEntry>,
    failures: Vec<EntryFailure>,
}

impl ExtractionReport {
    pub fn record_written(&mut self, path: PathBuf, bytes: u64) {
        self.written.push(WrittenEntry::new(path, bytes));
    }

    pub fn record_failure(&mut self, path: PathBuf, reason: String) {
        self.failures.push(EntryFailure::new(path, reason));
    }

    pub fn written(&self) -> &[WrittenEntry] {
        &self.written
    }

    pub fn failures(&self) -> &[EntryFailure] {
        &self.failures
    }

    pub fn entry_count(&self) -> usize {
        self.written.len()
    }

    pub fn bytes_written(&self) -> u64 {
        self.written.iter().map(|entry| entry.bytes).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Listing line for one archive entry (the `list` command).
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct EntryInfo {
    pub path: PathBuf,
    pub size: u64,
    pub kind: EntryKind,
    pub mtime: u64,
}

impl EntryInfo {
    /// Modification time rendered as UTC, or `-` when out of range.
    pub fn mtime_string(&self) -> String {
        i64::try_from(self.mtime)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_totals_follow_the_recorded_entries() {
        let mut report = ExtractionReport::default();
        report.record_written(PathBuf::from("a.txt"), 10);
        report.record_written(PathBuf::from("b.txt"), 32);
        report.record_failure(PathBuf::from("../evil"), "escapes target".to_string());

        assert_eq!(report.entry_count(), 2);
        assert_eq!(report.bytes_written(), 42);
        assert!(!report.is_clean());
    }

    #[test]
    fn mtime_renders_as_utc() {
        let info = EntryInfo::new(PathBuf::from("x"), 0, EntryKind::Regular, 0);
        assert_eq!(info.mtime_string(), "1970-01-01 00:00");
    }
}
