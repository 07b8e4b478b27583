// src/printer/printers.rs

//! Console printing of scan results.
//!
//! Functions print to a [`WriteColor`] so the caller decides the stream
//! and whether color is used.
//!
//! [`WriteColor`]: termcolor::WriteColor

use std::io::{
    Result,
    Write, // for `writeln!`
};

#[doc(hidden)]
pub use ::termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::data::counters::AggregateCounters;
use crate::data::event::EventRecord;
use crate::data::keyword::KeywordHit;
use crate::debug::printers::de_err;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// globals and constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`Color`] for the count headline.
///
/// [`Color`]: https://docs.rs/termcolor/1.1.3/termcolor/enum.Color.html
pub const COLOR_HEADLINE: Color = Color::Yellow;

/// [`Color`] for event messages.
pub const COLOR_MESSAGE: Color = Color::White;

/// [`Color`] for aggregate counter keys.
pub const COLOR_COUNTER: Color = Color::Cyan;

/// [`Color`] for some user-facing error messages.
pub const COLOR_ERROR: Color = Color::Red;

/// Printed when a scan found nothing.
pub const NO_ACTIVITY: &str = "No suspicious activity found.";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// printer functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Print colored output if `out` supports it, otherwise print plain
/// output.
///
/// See an example <https://docs.rs/termcolor/1.1.2/termcolor/#detecting-presence-of-a-terminal>.
pub fn print_colored<W: WriteColor>(
    color: Color,
    value: &[u8],
    out: &mut W,
) -> Result<()> {
    match out.set_color(ColorSpec::new().set_fg(Some(color))) {
        Ok(_) => {}
        Err(err) => {
            de_err!("print_colored: out.set_color({:?}) returned error {}", color, err);
            return Err(err);
        }
    };
    match out.write_all(value) {
        Ok(_) => {}
        Err(err) => {
            de_err!("print_colored: out.write_all(…) returned error {}", err);
            return Err(err);
        }
    }
    match out.reset() {
        Ok(_) => {}
        Err(err) => {
            de_err!("print_colored: out.reset() returned error {}", err);
            return Err(err);
        }
    }

    Ok(())
}

/// Print the console summary of a pattern scan.
///
/// ```text
/// Found 2 suspicious entries:
/// 2024-01-05 - Invalid user admin from 10.0.0.5
/// 2024-01-06 - Sudo authentication failure for bob
///
/// invalid_user:admin: 1
/// sudo_fail:bob: 1
/// ```
///
/// With no records prints [`NO_ACTIVITY`].
pub fn print_records<W: WriteColor>(
    out: &mut W,
    records: &[EventRecord],
    counters: &AggregateCounters,
) -> Result<()> {
    if records.is_empty() {
        writeln!(out, "{}", NO_ACTIVITY)?;
        return out.flush();
    }
    print_colored(
        COLOR_HEADLINE,
        format!("Found {} suspicious entries:\n", records.len()).as_bytes(),
        out,
    )?;
    for record in records.iter() {
        print_colored(COLOR_MESSAGE, record.message().as_bytes(), out)?;
        writeln!(out)?;
    }
    writeln!(out)?;
    for (key, count) in counters.iter() {
        print_colored(COLOR_COUNTER, key.as_bytes(), out)?;
        writeln!(out, ": {}", count)?;
    }

    out.flush()
}

/// Print the console summary of a keyword scan, each hit as
/// `line_number: line`.
///
/// With no hits prints [`NO_ACTIVITY`].
pub fn print_keyword_hits<W: WriteColor>(
    out: &mut W,
    hits: &[KeywordHit],
) -> Result<()> {
    if hits.is_empty() {
        writeln!(out, "{}", NO_ACTIVITY)?;
        return out.flush();
    }
    print_colored(
        COLOR_HEADLINE,
        format!("Found {} suspicious entries:\n", hits.len()).as_bytes(),
        out,
    )?;
    for hit in hits.iter() {
        writeln!(out, "{}", hit)?;
    }

    out.flush()
}

/// Print `message` to stderr colored as an error.
pub fn print_error_stderr(
    color_choice: ColorChoice,
    message: &str,
) -> Result<()> {
    let stderr = StandardStream::stderr(color_choice);
    let mut stderr_lock = stderr.lock();
    print_colored(COLOR_ERROR, b"ERROR: ", &mut stderr_lock)?;
    writeln!(stderr_lock, "{}", message)?;

    stderr_lock.flush()
}
