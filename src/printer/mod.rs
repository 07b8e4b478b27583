// src/printer/mod.rs

//! The `printer` module is for printing user-facing scan results
//! ([`EventRecord`s] and [`KeywordHit`s]) to the console with color, and
//! for writing report files.
//!
//! [`EventRecord`s]: crate::data::event::EventRecord
//! [`KeywordHit`s]: crate::data::keyword::KeywordHit

pub mod printers;
pub mod report;
pub mod summary;
