// src/readers/mod.rs

//! "Readers" for _alslib_.
//!
//! ## Overview of readers
//!
//! * [`scan_path`] finds the files of a path with
//!   [`process_path`], then scans each file.
//! * Scanning a file drives a [`LineClassifier`] over each line.
//! * A `LineClassifier` matches a line against a [`PatternSet`] to derive a
//!   [`Classification`].
//! * A `Classification` within the [`DateWindow`] becomes an
//!   [`EventRecord`] and increments the [`AggregateCounters`].
//!
//! <br/>
//!
//! [`scan_keyword_path`] finds lines containing a keyword, without patterns.
//!
//! <br/>
//!
//! _These are not rust "Readers"; these do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [`Read`]: std::io::Read
//! [`scan_path`]: crate::readers::logscanner::scan_path
//! [`scan_keyword_path`]: crate::readers::logscanner::scan_keyword_path
//! [`process_path`]: crate::readers::filepreprocessor::process_path
//! [`LineClassifier`]: crate::readers::classifier::LineClassifier
//! [`Classification`]: crate::readers::classifier::Classification
//! [`PatternSet`]: crate::readers::patternset::PatternSet
//! [`DateWindow`]: crate::data::datetime::DateWindow
//! [`EventRecord`]: crate::data::event::EventRecord
//! [`AggregateCounters`]: crate::data::counters::AggregateCounters

pub mod classifier;
pub mod filepreprocessor;
pub mod helpers;
pub mod logscanner;
pub mod patternset;
pub mod summary;
