// src/data/event.rs

//! Implements [`EventKind`] and [`EventRecord`], the classified result of one
//! log line.

use std::fmt;

use crate::common::{
    FPath,
    LineNumber,
};
use crate::data::datetime::{
    datetime_to_report_date,
    DateL,
    DateTimeL,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// EventKind
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub const EVENT_NAME_FAILED_LOGIN: &str = "failed_login";
pub const EVENT_NAME_INVALID_USER: &str = "invalid_user";
pub const EVENT_NAME_SUDO_FAIL: &str = "sudo_fail";

/// The semantic role of a pattern, resolved from the pattern name.
///
/// Each known kind has a bespoke message template. Any other pattern name
/// becomes [`EventKind::Other`] with the generic template.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum EventKind {
    /// `failed_login`
    FailedLogin,
    /// `invalid_user`
    InvalidUser,
    /// `sudo_fail`
    SudoFail,
    /// any other pattern name
    Other(String),
}

impl EventKind {
    /// Resolve a pattern `name` to an `EventKind`.
    pub fn from_name(name: &str) -> EventKind {
        match name {
            EVENT_NAME_FAILED_LOGIN => EventKind::FailedLogin,
            EVENT_NAME_INVALID_USER => EventKind::InvalidUser,
            EVENT_NAME_SUDO_FAIL => EventKind::SudoFail,
            _ => EventKind::Other(String::from(name)),
        }
    }

    /// The event type name, i.e. the pattern name.
    pub fn name(&self) -> &str {
        match self {
            EventKind::FailedLogin => EVENT_NAME_FAILED_LOGIN,
            EventKind::InvalidUser => EVENT_NAME_INVALID_USER,
            EventKind::SudoFail => EVENT_NAME_SUDO_FAIL,
            EventKind::Other(name) => name.as_str(),
        }
    }

    pub const fn is_known(&self) -> bool {
        !matches!(self, EventKind::Other(_))
    }

    /// Render the human-readable message for an event of this kind.
    pub fn message(
        &self,
        date: &str,
        user: &str,
        address: &str,
    ) -> String {
        match self {
            EventKind::FailedLogin => format!("{} - Failed login by {} from {}", date, user, address),
            EventKind::InvalidUser => format!("{} - Invalid user {} from {}", date, user, address),
            EventKind::SudoFail => format!("{} - Sudo authentication failure for {}", date, user),
            EventKind::Other(name) => format!("{} - Matched {}", date, name),
        }
    }

    /// The [`AggregateCounters`] key for an event of this kind.
    ///
    /// Known kinds are keyed `kind:user` when a user was captured.
    /// Other kinds are keyed by name alone.
    ///
    /// [`AggregateCounters`]: crate::data::counters::AggregateCounters
    pub fn counter_key(
        &self,
        user: &str,
    ) -> String {
        match self {
            EventKind::Other(name) => name.clone(),
            _ if user.is_empty() => String::from(self.name()),
            _ => format!("{}:{}", self.name(), user),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// EventRecord
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One classified log line that passed the date window.
///
/// Fields are private; an `EventRecord` is immutable once created.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EventRecord {
    path: FPath,
    line_number: LineNumber,
    datetime: DateTimeL,
    kind: EventKind,
    user: String,
    address: String,
    message: String,
}

pub type EventRecords = Vec<EventRecord>;

impl EventRecord {
    pub fn new(
        path: FPath,
        line_number: LineNumber,
        datetime: DateTimeL,
        kind: EventKind,
        user: String,
        address: String,
    ) -> EventRecord {
        let date: String = datetime_to_report_date(&datetime);
        let message: String = kind.message(date.as_str(), user.as_str(), address.as_str());

        EventRecord {
            path,
            line_number,
            datetime,
            kind,
            user,
            address,
            message,
        }
    }

    /// path of the file this event was found in
    pub fn path(&self) -> &FPath {
        &self.path
    }

    /// one-based line number
    pub const fn line_number(&self) -> LineNumber {
        self.line_number
    }

    /// the full parsed timestamp
    pub const fn datetime(&self) -> &DateTimeL {
        &self.datetime
    }

    /// the calendar date of the timestamp
    pub fn date(&self) -> DateL {
        self.datetime.date()
    }

    /// the date as written in messages and reports, `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        datetime_to_report_date(&self.datetime)
    }

    pub const fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn event_type(&self) -> &str {
        self.kind.name()
    }

    /// captured user, empty if not captured
    pub fn user(&self) -> &str {
        self.user.as_str()
    }

    /// captured source address, empty if not captured
    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn counter_key(&self) -> String {
        self.kind.counter_key(self.user.as_str())
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
