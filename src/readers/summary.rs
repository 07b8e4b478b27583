// src/readers/summary.rs

//! Implements `ScanSummary` statistics tracking struct.

use std::fmt;

use crate::common::Count;
use crate::readers::classifier::SummaryLineClassifier;

/// Accumulated statistics about scanning activity of one file, or of many
/// files once merged.
///
/// For CLI option `--summary`. Statistics never affect the scan results.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ScanSummary {
    /// files scanned successfully
    pub files: Count,
    /// files that could not be scanned
    pub files_failed: Count,
    /// files in a directory skipped for not having the recognized suffix
    pub files_skipped: Count,
    /// lines read
    pub lines: Count,
    /// records or keyword hits produced
    pub matched: Count,
    /// classified lines dropped for being outside the date window
    pub rejected_window: Count,
    /// pattern matches discarded for an unparseable timestamp
    pub bad_timestamp: Count,
}

impl ScanSummary {
    /// Summary of one successfully scanned file.
    pub fn from_classifier(
        summary_classifier: &SummaryLineClassifier,
        matched: Count,
    ) -> ScanSummary {
        ScanSummary {
            files: 1,
            lines: summary_classifier.lines,
            matched,
            rejected_window: summary_classifier.classified - matched,
            bad_timestamp: summary_classifier.bad_timestamp,
            ..Default::default()
        }
    }

    /// Add `other` into `self`.
    pub fn merge(
        &mut self,
        other: &ScanSummary,
    ) {
        self.files += other.files;
        self.files_failed += other.files_failed;
        self.files_skipped += other.files_skipped;
        self.lines += other.lines;
        self.matched += other.matched;
        self.rejected_window += other.rejected_window;
        self.bad_timestamp += other.bad_timestamp;
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "files scanned          : {}", self.files)?;
        writeln!(f, "files failed           : {}", self.files_failed)?;
        writeln!(f, "files skipped (suffix) : {}", self.files_skipped)?;
        writeln!(f, "lines read             : {}", self.lines)?;
        writeln!(f, "matches                : {}", self.matched)?;
        writeln!(f, "outside date window    : {}", self.rejected_window)?;
        write!(f, "unparseable timestamps : {}", self.bad_timestamp)
    }
}
