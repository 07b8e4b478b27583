// src/printer/summary.rs

//! CLI option `--summary` printing functions.
//! Only used by `als.rs`.

use std::io::{
    Result,
    Write,
};

use crate::printer::printers::{
    print_colored,
    Color,
    WriteColor,
    COLOR_ERROR,
};
use crate::readers::logscanner::ScanFailures;
use crate::readers::summary::ScanSummary;

/// [`Color`] for the summary heading.
const COLOR_SUMMARY: Color = Color::Green;

/// Print the `summary` of a scan and each of the `failures`.
pub fn print_summary<W: WriteColor>(
    out: &mut W,
    summary: &ScanSummary,
    failures: &ScanFailures,
) -> Result<()> {
    print_colored(COLOR_SUMMARY, b"Summary:\n", out)?;
    writeln!(out, "{}", summary)?;
    for failure in failures.iter() {
        print_colored(COLOR_ERROR, b"failed: ", out)?;
        writeln!(out, "{}", failure)?;
    }

    out.flush()
}
