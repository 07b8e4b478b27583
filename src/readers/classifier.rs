// src/readers/classifier.rs

//! Implements [`LineClassifier`], which matches one line of text against a
//! [`PatternSet`] and extracts the event fields.
//!
//! [`PatternSet`]: crate::readers::patternset::PatternSet

use ::regex::Captures;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::common::{
    Count,
    FPath,
    LineNumber,
};
use crate::data::datetime::{
    log_timestamp_parse,
    DateTimeL,
};
use crate::data::event::{
    EventKind,
    EventRecord,
};
use crate::debug::printers::str_to_String_noraw;
use crate::readers::patternset::{
    GroupIndex,
    Pattern,
    PatternSet,
};

/// The fields extracted from a line by the first pattern that matched and
/// had a parseable timestamp.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Classification {
    pub kind: EventKind,
    pub datetime: DateTimeL,
    /// empty if not captured
    pub user: String,
    /// empty if not captured
    pub address: String,
}

impl Classification {
    /// Create the [`EventRecord`] for this `Classification` found at
    /// `line_number` of `path`.
    pub fn into_event_record(
        self,
        path: FPath,
        line_number: LineNumber,
    ) -> EventRecord {
        EventRecord::new(path, line_number, self.datetime, self.kind, self.user, self.address)
    }
}

/// Accumulated statistics of a [`LineClassifier`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SummaryLineClassifier {
    /// lines passed to `classify`
    pub lines: Count,
    /// lines that produced a `Classification`
    pub classified: Count,
    /// pattern matches discarded because the timestamp did not parse
    pub bad_timestamp: Count,
}

/// Classifies lines using a borrowed [`PatternSet`].
///
/// Patterns are tried in order. The first pattern that matches anywhere in
/// the line and captures a parseable timestamp wins. A pattern that matches
/// with a malformed or absent timestamp is skipped and the next pattern is
/// tried.
pub struct LineClassifier<'a> {
    patternset: &'a PatternSet,
    summary: SummaryLineClassifier,
}

impl<'a> LineClassifier<'a> {
    pub fn new(patternset: &'a PatternSet) -> LineClassifier<'a> {
        LineClassifier {
            patternset,
            summary: SummaryLineClassifier::default(),
        }
    }

    pub const fn patternset(&self) -> &PatternSet {
        self.patternset
    }

    /// Classify one `line`. `None` means no pattern matched.
    pub fn classify(
        &mut self,
        line: &str,
    ) -> Option<Classification> {
        defn!("({:?})", str_to_String_noraw(line));
        self.summary.lines += 1;
        for pattern in self.patternset.iter() {
            let captures: Captures = match pattern.regex().captures(line) {
                Some(val) => val,
                None => continue,
            };
            defo!("pattern {:?} matched", pattern.name());
            match classify_captures(pattern, &captures) {
                Some(classification) => {
                    self.summary.classified += 1;
                    defx!("return {:?}", classification);
                    return Some(classification);
                }
                None => {
                    defo!("pattern {:?} bad timestamp; try next pattern", pattern.name());
                    self.summary.bad_timestamp += 1;
                }
            }
        }
        defx!("return None");

        None
    }

    pub const fn summary(&self) -> SummaryLineClassifier {
        self.summary
    }
}

/// Return the text of capture group `index`, empty if the group is not
/// declared or did not participate in the match.
fn capture_str(
    captures: &Captures,
    index: Option<GroupIndex>,
) -> String {
    match index.and_then(|i| captures.get(i)) {
        Some(m) => String::from(m.as_str()),
        None => String::new(),
    }
}

/// Extract a `Classification` from the `captures` of `pattern`.
/// `None` if the timestamp is absent or malformed.
fn classify_captures(
    pattern: &Pattern,
    captures: &Captures,
) -> Option<Classification> {
    let timestamp: &str = captures
        .get(pattern.schema().timestamp)?
        .as_str();
    let datetime: DateTimeL = log_timestamp_parse(timestamp)?;

    Some(Classification {
        kind: pattern.kind().clone(),
        datetime,
        user: capture_str(captures, pattern.schema().user),
        address: capture_str(captures, pattern.schema().address),
    })
}

/// Classify one `line` using `patternset`. `None` means no pattern matched.
pub fn classify(
    line: &str,
    patternset: &PatternSet,
) -> Option<Classification> {
    LineClassifier::new(patternset).classify(line)
}
