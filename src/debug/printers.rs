// src/debug/printers.rs

//! Printer macros for warnings and errors, and a few helpers for debug
//! builds.
//!
//! `e_*` macros always print to stderr. `de_err!` only prints in debug and
//! test builds.

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `d`ebug `e`println! an `err`or
#[macro_export]
macro_rules! de_err {
    (
        $($args:tt)*
    ) => {
        {
            #[cfg(any(debug_assertions,test))]
            eprint!("ERROR: ");
            #[cfg(any(debug_assertions,test))]
            eprintln!($($args)*)
        }
    }
}
pub use de_err;

/// `e`println! an `err`or
#[macro_export]
macro_rules! e_err {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("ERROR: ");
            eprintln!($($args)*)
        }
    }
}
pub use e_err;

/// `e`println! a `w`a`rn`ing
#[macro_export]
macro_rules! e_wrn {
    (
        $($args:tt)*
    ) => {
        {
            eprint!("WARNING: ");
            eprintln!($($args)*)
        }
    }
}
pub use e_wrn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Turn a control character into its pictoral unicode representation,
/// e.g. `'\t'` returns `'␉'`. Other chars are returned unchanged.
///
/// Keeps the printed width of a control character at 1 so log lines in
/// debug output stay readable.
pub const fn char_to_char_noraw(c: char) -> char {
    // https://en.wikipedia.org/wiki/Control_Pictures
    match c as u32 {
        0..=31 => match char::from_u32(0x2400 + c as u32) {
            Some(c_) => c_,
            None => c,
        },
        127 => '␡',
        _ => c,
    }
}

/// Transform a `str` to a `String` with control characters made visible.
///
/// only intended for debugging
#[allow(non_snake_case)]
pub fn str_to_String_noraw(str_buf: &str) -> String {
    str_buf
        .chars()
        .map(char_to_char_noraw)
        .collect()
}
