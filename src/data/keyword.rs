// src/data/keyword.rs

//! Implements [`KeywordHit`], a line that contains a searched keyword.

use std::fmt;

use crate::common::{
    FPath,
    LineNumber,
};

/// A line containing the keyword passed to
/// [`scan_keyword_path`](crate::readers::logscanner::scan_keyword_path).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeywordHit {
    pub path: FPath,
    pub line_number: LineNumber,
    /// the line with surrounding whitespace removed
    pub line: String,
}

pub type KeywordHits = Vec<KeywordHit>;

/// Case-insensitive matcher for one keyword.
#[derive(Clone, Debug)]
pub struct KeywordMatcher {
    keyword_lower: String,
}

impl KeywordMatcher {
    pub fn new(keyword: &str) -> KeywordMatcher {
        KeywordMatcher {
            keyword_lower: keyword.to_lowercase(),
        }
    }

    pub fn keyword(&self) -> &str {
        self.keyword_lower.as_str()
    }

    /// Does `line` contain the keyword, ignoring case?
    pub fn is_match(
        &self,
        line: &str,
    ) -> bool {
        line.to_lowercase()
            .contains(self.keyword_lower.as_str())
    }
}

impl fmt::Display for KeywordHit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.line_number, self.line)
    }
}
