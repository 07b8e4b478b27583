// src/readers/patternset.rs

//! Implements [`PatternSet`], the ordered collection of named regular
//! expressions used to classify log lines.
//!
//! Patterns are loaded from a TOML file with a `[patterns]` table of
//! `name = "regex"` entries. Table order is match priority.
//!
//! ```toml
//! [patterns]
//! invalid_user = '(\w{3}\s+\d{1,2} \d{4} \d{2}:\d{2}:\d{2}).*invalid user (\w+) from ([\d.]+)'
//! sudo_fail = '(?P<timestamp>\w{3}\s+\d{1,2} \d{4} \d{2}:\d{2}:\d{2}).*sudo.*authentication failure.*user=(?P<user>\w+)'
//! ```
//!
//! A pattern captures, by position or by name:
//!
//! | position | name        | value                          |
//! |----------|-------------|--------------------------------|
//! | 1        | `timestamp` | timestamp, required            |
//! | 2        | `user`      | user identifier, optional      |
//! | 3        | `ip`        | source network address, optional |
//!
//! Each value is taken from the group of that name if declared, else from
//! the unnamed group at that position.
//!
//! An entry that does not compile, is not a string, or has no timestamp
//! capture is dropped with a warning. The remaining entries still load.

use std::fmt;
use std::io::ErrorKind;

use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::common::{
    FPath,
    CONFIG_SECTION_PATTERNS,
};
use crate::data::event::EventKind;
use crate::debug::printers::e_wrn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// capture schema
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Index of a capture group within a [`Regex`].
pub type GroupIndex = usize;

pub const CAPTURE_NAME_TIMESTAMP: &str = "timestamp";
pub const CAPTURE_NAME_USER: &str = "user";
pub const CAPTURE_NAME_ADDRESS: &str = "ip";

/// Which capture groups of a pattern hold the timestamp, the user, and the
/// source address. Resolved once when the pattern is loaded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CaptureSchema {
    pub timestamp: GroupIndex,
    pub user: Option<GroupIndex>,
    pub address: Option<GroupIndex>,
}

impl CaptureSchema {
    /// Resolve the `CaptureSchema` of `regex`.
    ///
    /// Each role is resolved on its own; the group of that name if
    /// declared, else the unnamed group at the role's position.
    ///
    /// Returns `None` if `regex` has no timestamp capture.
    pub fn from_regex(regex: &Regex) -> Option<CaptureSchema> {
        // index 0 is the entire match
        let names: Vec<Option<&str>> = regex.capture_names().collect();
        let resolve = |name: &str, position: GroupIndex| -> Option<GroupIndex> {
            match names.iter().position(|n| *n == Some(name)) {
                Some(index) => Some(index),
                None => match names.get(position) {
                    Some(None) => Some(position),
                    _ => None,
                },
            }
        };
        let timestamp: Option<GroupIndex> = resolve(CAPTURE_NAME_TIMESTAMP, 1);
        let user: Option<GroupIndex> = resolve(CAPTURE_NAME_USER, 2);
        let address: Option<GroupIndex> = resolve(CAPTURE_NAME_ADDRESS, 3);
        defñ!("timestamp {:?} user {:?} address {:?}", timestamp, user, address);

        Some(CaptureSchema {
            timestamp: timestamp?,
            user,
            address,
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Why one configuration entry was dropped. Not fatal.
#[derive(Debug)]
pub enum PatternError {
    /// the regular expression failed to compile
    Compile(String, ::regex::Error),
    /// the configuration value is not a string; holds the value type name
    NotAString(String, String),
    /// the regular expression has no timestamp capture group
    NoTimestampCapture(String),
}

impl PatternError {
    /// name of the dropped pattern
    pub fn name(&self) -> &str {
        match self {
            PatternError::Compile(name, _) => name.as_str(),
            PatternError::NotAString(name, _) => name.as_str(),
            PatternError::NoTimestampCapture(name) => name.as_str(),
        }
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PatternError::Compile(name, err) => write!(f, "invalid regex for pattern {:?}: {}", name, err),
            PatternError::NotAString(name, type_str) => {
                write!(f, "pattern {:?} must be a string, found {}", name, type_str)
            }
            PatternError::NoTimestampCapture(name) => {
                write!(f, "pattern {:?} has no timestamp capture group", name)
            }
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatternError::Compile(_, err) => Some(err),
            _ => None,
        }
    }
}

/// The configuration file could not be used at all. Fatal.
#[derive(Debug)]
pub enum ConfigError {
    /// reading the file failed (other than not existing)
    Io(FPath, std::io::Error),
    /// the file is not valid TOML
    Parse(FPath, ::toml::de::Error),
    /// the `[patterns]` entry is not a table
    SectionNotATable(FPath),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(path, err) => write!(f, "cannot read configuration {:?}: {}", path, err),
            ConfigError::Parse(path, err) => write!(f, "cannot parse configuration {:?}: {}", path, err),
            ConfigError::SectionNotATable(path) => {
                write!(f, "configuration {:?}: [{}] must be a table", path, CONFIG_SECTION_PATTERNS)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, err) => Some(err),
            ConfigError::Parse(_, err) => Some(err),
            ConfigError::SectionNotATable(_) => None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Pattern
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A named, compiled regular expression with its [`CaptureSchema`].
#[derive(Clone, Debug)]
pub struct Pattern {
    name: String,
    kind: EventKind,
    regex: Regex,
    schema: CaptureSchema,
}

impl Pattern {
    /// Compile `regex_str` and resolve its capture schema.
    pub fn new(
        name: &str,
        regex_str: &str,
    ) -> Result<Pattern, PatternError> {
        let regex: Regex = match Regex::new(regex_str) {
            Ok(val) => val,
            Err(err) => return Err(PatternError::Compile(String::from(name), err)),
        };
        let schema: CaptureSchema = match CaptureSchema::from_regex(&regex) {
            Some(val) => val,
            None => return Err(PatternError::NoTimestampCapture(String::from(name))),
        };

        Ok(Pattern {
            name: String::from(name),
            kind: EventKind::from_name(name),
            regex,
            schema,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub const fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    pub const fn schema(&self) -> &CaptureSchema {
        &self.schema
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PatternSet
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Built-in patterns for common `sshd` and `sudo` messages.
///
/// `invalid_user` precedes `failed_login` since an sshd
/// "Failed password for invalid user" line matches both.
pub const DEFAULT_PATTERNS_TOML: &str = r#"
[patterns]
invalid_user = '(\w{3}\s+\d{1,2} \d{4} \d{2}:\d{2}:\d{2}).*[Ii]nvalid user (\S+) from ([0-9A-Fa-f.:]+)'
failed_login = '(\w{3}\s+\d{1,2} \d{4} \d{2}:\d{2}:\d{2}).*Failed password for (\S+) from ([0-9A-Fa-f.:]+)'
sudo_fail = '(\w{3}\s+\d{1,2} \d{4} \d{2}:\d{2}:\d{2}).*sudo.*authentication failure.*\buser=(\S+)'
"#;

/// Ordered, read-only collection of [`Pattern`s].
///
/// Iteration order is configuration order, which is the order patterns are
/// tried against a line.
///
/// [`Pattern`s]: Pattern
#[derive(Clone, Debug, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

/// Results of building a `PatternSet`; the set and the dropped entries.
pub type PatternSetLoad = (PatternSet, Vec<PatternError>);

impl PatternSet {
    /// An empty `PatternSet`.
    pub fn new() -> PatternSet {
        PatternSet::default()
    }

    /// Compile `(name, regex)` entries in order. Entries that fail are
    /// returned as `PatternError`s and left out of the set.
    ///
    /// A repeated name replaces the earlier entry in the earlier position.
    pub fn from_entries<I, K, V>(entries: I) -> PatternSetLoad
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        defn!();
        let mut patternset = PatternSet::new();
        let mut errors: Vec<PatternError> = Vec::new();
        for (name, regex_str) in entries.into_iter() {
            match Pattern::new(name.as_ref(), regex_str.as_ref()) {
                Ok(pattern) => patternset.insert(pattern),
                Err(err) => {
                    defo!("drop {:?}: {}", name.as_ref(), err);
                    patternset.remove(name.as_ref());
                    errors.push(err);
                }
            }
        }
        defx!("{} patterns, {} errors", patternset.len(), errors.len());

        (patternset, errors)
    }

    /// Like [`from_entries`] but print a warning for each dropped entry.
    ///
    /// [`from_entries`]: PatternSet::from_entries
    pub fn load<I, K, V>(entries: I) -> PatternSet
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let (patternset, errors) = PatternSet::from_entries(entries);
        warn_pattern_errors(&errors);

        patternset
    }

    /// Build a `PatternSet` from TOML `data`. `source` names the data in
    /// errors.
    ///
    /// A missing `[patterns]` table yields an empty set.
    pub fn from_toml_str(
        data: &str,
        source: &FPath,
    ) -> Result<PatternSetLoad, ConfigError> {
        defn!("({:?})", source);
        let table: ::toml::Table = match data.parse::<::toml::Table>() {
            Ok(val) => val,
            Err(err) => {
                defx!("parse error {}", err);
                return Err(ConfigError::Parse(source.clone(), err));
            }
        };
        let section: &::toml::Table = match table.get(CONFIG_SECTION_PATTERNS) {
            Some(::toml::Value::Table(section)) => section,
            Some(_) => {
                defx!("[{}] is not a table", CONFIG_SECTION_PATTERNS);
                return Err(ConfigError::SectionNotATable(source.clone()));
            }
            None => {
                defx!("no [{}] table; empty PatternSet", CONFIG_SECTION_PATTERNS);
                return Ok((PatternSet::new(), Vec::new()));
            }
        };
        let mut entries: Vec<(&str, &str)> = Vec::with_capacity(section.len());
        let mut errors: Vec<PatternError> = Vec::new();
        for (name, value) in section.iter() {
            match value.as_str() {
                Some(regex_str) => entries.push((name.as_str(), regex_str)),
                None => errors.push(PatternError::NotAString(name.clone(), String::from(value.type_str()))),
            }
        }
        let (patternset, errors_compile) = PatternSet::from_entries(entries);
        errors.extend(errors_compile);
        defx!("{} patterns, {} errors", patternset.len(), errors.len());

        Ok((patternset, errors))
    }

    /// Load the configuration file at `path`, printing a warning for each
    /// dropped entry.
    ///
    /// A missing file yields an empty set and a warning. A file that cannot
    /// be read or parsed is an error.
    pub fn load_file(path: &FPath) -> Result<PatternSet, ConfigError> {
        defn!("({:?})", path);
        let data: String = match std::fs::read_to_string(path) {
            Ok(val) => val,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                e_wrn!("configuration file {:?} not found; no patterns loaded", path);
                defx!("NotFound; return empty PatternSet");
                return Ok(PatternSet::new());
            }
            Err(err) => {
                defx!("error {}", err);
                return Err(ConfigError::Io(path.clone(), err));
            }
        };
        let (patternset, errors) = PatternSet::from_toml_str(data.as_str(), path)?;
        warn_pattern_errors(&errors);
        defx!("loaded {} patterns", patternset.len());

        Ok(patternset)
    }

    /// The built-in [`DEFAULT_PATTERNS_TOML`].
    pub fn default_patterns() -> PatternSet {
        let source: FPath = FPath::from("<built-in>");
        match PatternSet::from_toml_str(DEFAULT_PATTERNS_TOML, &source) {
            Ok((patternset, errors)) => {
                warn_pattern_errors(&errors);
                patternset
            }
            Err(err) => {
                e_wrn!("{}", err);
                PatternSet::new()
            }
        }
    }

    /// Insert `pattern` at the end, or replace the same-named pattern in
    /// place.
    fn insert(
        &mut self,
        pattern: Pattern,
    ) {
        match self
            .patterns
            .iter_mut()
            .find(|p| p.name == pattern.name)
        {
            Some(existing) => *existing = pattern,
            None => self.patterns.push(pattern),
        }
    }

    fn remove(
        &mut self,
        name: &str,
    ) {
        self.patterns.retain(|p| p.name != name);
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Pattern> {
        self.patterns
            .iter()
            .find(|p| p.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.patterns
            .iter()
            .map(|p| p.name())
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<'a> IntoIterator for &'a PatternSet {
    type Item = &'a Pattern;
    type IntoIter = std::slice::Iter<'a, Pattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

/// Print a warning for each dropped pattern.
pub fn warn_pattern_errors(errors: &[PatternError]) {
    for err in errors.iter() {
        e_wrn!("{}; pattern skipped", err);
    }
}
