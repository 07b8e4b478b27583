// src/data/datetime.rs

//! Functions to parse the timestamp embedded in a log line and to compare
//! a parsed timestamp against a [`DateWindow`].
//!
//! Timestamps have the fixed form `Mon DD YYYY HH:MM:SS`, e.g.
//! `Jan  5 2024 10:22:31`; a three-letter month abbreviation, a
//! space-padded day, a four-digit year, and a 24-hour time.
//! There is no timezone handling; all values are naive.
//!
//! [`DateWindow`]: crate::data::datetime::DateWindow

#![allow(non_camel_case_types)]

use std::fmt;

#[doc(hidden)]
pub use ::chrono::{
    Datelike,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
    Timelike,
};
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::debug::printers::str_to_String_noraw;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// type aliases and constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `L`og `DateTime`; a timestamp parsed from a log line.
pub type DateTimeL = NaiveDateTime;
pub type DateTimeLOpt = Option<DateTimeL>;
/// `L`og `Date`; the calendar date of a [`DateTimeL`].
pub type DateL = NaiveDate;
pub type DateLOpt = Option<DateL>;

/// [`chrono` strftime] pattern of the timestamp within a log line.
///
/// `%d` accepts one or two digits so both `Jan  5` (after whitespace is
/// collapsed) and `Jan 05` parse.
///
/// [`chrono` strftime]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
pub const LOG_TIMESTAMP_FORMAT: &str = "%b %d %Y %H:%M:%S";

/// strftime pattern of dates passed by the user, e.g. `--start 2024-01-31`.
pub const CLI_DATE_FORMAT: &str = "%Y-%m-%d";

/// strftime pattern of dates written to messages and reports.
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// strftime pattern of the generation timestamp in report file names.
pub const REPORT_FILENAME_DATETIME_FORMAT: &str = "%Y%m%d_%H%M%S";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Parse a timestamp substring captured from a log line using
/// [`LOG_TIMESTAMP_FORMAT`].
///
/// Runs of whitespace (the space-padded day) are collapsed to a single space
/// before parsing. Returns `None` for a malformed timestamp.
pub fn log_timestamp_parse(data: &str) -> DateTimeLOpt {
    defn!("({:?})", str_to_String_noraw(data));
    let collapsed: String = data
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ");
    match NaiveDateTime::parse_from_str(collapsed.as_str(), LOG_TIMESTAMP_FORMAT) {
        Ok(val) => {
            defx!("return Some({:?})", val);

            Some(val)
        }
        Err(_err) => {
            defx!("parse_from_str({:?}, {:?}) failed ParseError: {}", collapsed, LOG_TIMESTAMP_FORMAT, _err);

            None
        }
    }
}

/// Parse a user-passed date in [`CLI_DATE_FORMAT`].
pub fn datel_parse_from_str(data: &str) -> Result<DateL, ::chrono::ParseError> {
    NaiveDate::parse_from_str(data.trim(), CLI_DATE_FORMAT)
}

/// Render the calendar date of `dt` as used in messages and reports.
pub fn datetime_to_report_date(dt: &DateTimeL) -> String {
    dt.format(REPORT_DATE_FORMAT).to_string()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// filtering
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An inclusive date range for filtering parsed timestamps.
///
/// Either bound may be absent, meaning unbounded on that side.
/// The `start` bound is the first instant of its day, the `end` bound is the
/// last second of its day (`23:59:59`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DateWindow {
    start: DateLOpt,
    end: DateLOpt,
    /// `start` at `00:00:00`
    dt_after: DateTimeLOpt,
    /// `end` at `23:59:59`
    dt_before: DateTimeLOpt,
}

/// Error returned by [`DateWindow::try_new`] when `start` is after `end`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateWindowError {
    pub start: DateL,
    pub end: DateL,
}

impl fmt::Display for DateWindowError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "start date {} is after end date {}", self.start, self.end)
    }
}

impl std::error::Error for DateWindowError {}

impl DateWindow {
    /// A window that accepts everything.
    pub const UNBOUNDED: DateWindow = DateWindow {
        start: None,
        end: None,
        dt_after: None,
        dt_before: None,
    };

    /// Create a `DateWindow`. A `start` later than `end` is allowed and
    /// produces a window that rejects everything; see [`try_new`].
    ///
    /// [`try_new`]: DateWindow::try_new
    pub fn new(
        start: DateLOpt,
        end: DateLOpt,
    ) -> DateWindow {
        let dt_after: DateTimeLOpt = start.and_then(|d| d.and_hms_opt(0, 0, 0));
        let dt_before: DateTimeLOpt = end.and_then(|d| d.and_hms_opt(23, 59, 59));
        defñ!("start {:?} end {:?} → ({:?}, {:?})", start, end, dt_after, dt_before);

        DateWindow {
            start,
            end,
            dt_after,
            dt_before,
        }
    }

    /// Create a `DateWindow`, failing if `start` is after `end`.
    pub fn try_new(
        start: DateLOpt,
        end: DateLOpt,
    ) -> Result<DateWindow, DateWindowError> {
        if let (Some(start_), Some(end_)) = (start, end) {
            if start_ > end_ {
                return Err(DateWindowError { start: start_, end: end_ });
            }
        }

        Ok(DateWindow::new(start, end))
    }

    pub const fn start(&self) -> DateLOpt {
        self.start
    }

    pub const fn end(&self) -> DateLOpt {
        self.end
    }

    /// The normalized lower bound, `start` at `00:00:00`.
    pub const fn dt_after(&self) -> DateTimeLOpt {
        self.dt_after
    }

    /// The normalized upper bound, `end` at `23:59:59`.
    pub const fn dt_before(&self) -> DateTimeLOpt {
        self.dt_before
    }

    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Is `dt` within this window?
    pub fn contains(
        &self,
        dt: &DateTimeL,
    ) -> bool {
        dt_pass_filters(dt, &self.dt_after, &self.dt_before).is_pass()
    }
}

/// Describe the result of comparing one [`DateTimeL`] to two DateTime
/// filters `(after, before)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Result_Filter_DateTime2 {
    /// like Pass
    InRange,
    /// like Fail
    BeforeRange,
    /// like Fail
    AfterRange,
}

impl Result_Filter_DateTime2 {
    #[inline(always)]
    pub const fn is_pass(&self) -> bool {
        matches!(*self, Result_Filter_DateTime2::InRange)
    }

    #[inline(always)]
    pub const fn is_fail(&self) -> bool {
        matches!(*self, Result_Filter_DateTime2::AfterRange | Result_Filter_DateTime2::BeforeRange)
    }
}

/// How does the passed [`DateTimeL`] `dt` pass the optional filters
/// `dt_filter_after` and `dt_filter_before`? Is `dt` before
/// ([`BeforeRange`]), after ([`AfterRange`]), or in between ([`InRange`])?
///
/// Both filters are inclusive. An absent filter never rejects.
///
/// [`BeforeRange`]: Result_Filter_DateTime2::BeforeRange
/// [`AfterRange`]: Result_Filter_DateTime2::AfterRange
/// [`InRange`]: Result_Filter_DateTime2::InRange
pub fn dt_pass_filters(
    dt: &DateTimeL,
    dt_filter_after: &DateTimeLOpt,
    dt_filter_before: &DateTimeLOpt,
) -> Result_Filter_DateTime2 {
    defn!("({:?}, {:?}, {:?})", dt, dt_filter_after, dt_filter_before);
    if let Some(da) = dt_filter_after {
        if dt < da {
            defx!("return {:?}", Result_Filter_DateTime2::BeforeRange);
            return Result_Filter_DateTime2::BeforeRange;
        }
    }
    if let Some(db) = dt_filter_before {
        if db < dt {
            defx!("return {:?}", Result_Filter_DateTime2::AfterRange);
            return Result_Filter_DateTime2::AfterRange;
        }
    }
    defx!("return {:?}", Result_Filter_DateTime2::InRange);

    Result_Filter_DateTime2::InRange
}

/// Is `dt` inside the inclusive `window`?
#[inline(always)]
pub fn in_window(
    dt: &DateTimeL,
    window: &DateWindow,
) -> bool {
    window.contains(dt)
}
