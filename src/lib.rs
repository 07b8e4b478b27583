// src/lib.rs

//! _alslib_ scans authentication logs for security-relevant events.
//!
//! Lines are classified by an ordered [`PatternSet`] of named regular
//! expressions, filtered by an inclusive [`DateWindow`], and collected as
//! [`EventRecord`s] with per-event [`AggregateCounters`].
//!
//! See [`scan_path`] to start.
//!
//! [`PatternSet`]: crate::readers::patternset::PatternSet
//! [`DateWindow`]: crate::data::datetime::DateWindow
//! [`EventRecord`s]: crate::data::event::EventRecord
//! [`AggregateCounters`]: crate::data::counters::AggregateCounters
//! [`scan_path`]: crate::readers::logscanner::scan_path

pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
