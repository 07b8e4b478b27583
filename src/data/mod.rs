// src/data/mod.rs

//! The `data` module is specialized data containers for classified log
//! lines.
//!
//! ## Definitions of data
//!
//! ### Pattern
//!
//! A "pattern" is a named regular expression loaded from the configuration
//! file. It captures a timestamp and optionally a user and a source address.
//! See [`PatternSet`].
//!
//! ### Event
//!
//! An "event" is one log line matched by a pattern, with a parseable
//! timestamp that falls within the [`DateWindow`].
//! An event is represented by an [`EventRecord`]. The pattern name decides
//! the [`EventKind`], which decides the event message.
//!
//! ### Aggregate counters
//!
//! A running tally of events keyed by event type and, for known kinds, the
//! captured user. Represented by [`AggregateCounters`].
//!
//! ### Keyword hit
//!
//! A line containing a plain keyword, ignoring case. Represented by a
//! [`KeywordHit`].
//!
//! [`PatternSet`]: crate::readers::patternset::PatternSet
//! [`DateWindow`]: crate::data::datetime::DateWindow
//! [`EventRecord`]: crate::data::event::EventRecord
//! [`EventKind`]: crate::data::event::EventKind
//! [`AggregateCounters`]: crate::data::counters::AggregateCounters
//! [`KeywordHit`]: crate::data::keyword::KeywordHit

pub mod counters;
pub mod datetime;
pub mod event;
pub mod keyword;
