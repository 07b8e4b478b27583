// src/tests/mod.rs

//! Tests for _alslib_.
//!
//! Tests are placed at `src/tests/`, inside the `alslib`. This is a
//! reasonable trade-off of separation and access.
//!
//! Tests placed at top-level path `tests/` do not have crate-internal
//! visibility.

pub mod common;
pub mod logscanner_tests;
