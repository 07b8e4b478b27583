// src/debug/mod.rs

//! The `debug` module is printer macros for warnings and errors, and helpers
//! for test builds.

#[cfg(test)]
pub mod helpers;

pub mod printers;
