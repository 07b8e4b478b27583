// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling, configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;

/// General purpose counter.
pub type Count = u64;

/// One-based line number within a scanned file.
pub type LineNumber = u64;

/// Default file name suffix recognized when scanning a directory.
pub const FILE_SUFFIX_DEFAULT: &str = ".log";

/// Default path of the pattern configuration file.
pub const CONFIG_PATH_DEFAULT: &str = "patterns.toml";

/// Name of the configuration table holding `name = "regex"` entries.
pub const CONFIG_SECTION_PATTERNS: &str = "patterns";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Lines
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Single-byte newLine char as u8
#[allow(non_upper_case_globals)]
pub const NLu8: u8 = 10;
/// Single-byte carriage return as u8
#[allow(non_upper_case_globals)]
pub const CRu8: u8 = 13;

/// Remove trailing `'\n'` and `'\r'` bytes from a line buffer.
pub fn trim_line_ending(buffer: &[u8]) -> &[u8] {
    let mut end: usize = buffer.len();
    while end > 0 && (buffer[end - 1] == NLu8 || buffer[end - 1] == CRu8) {
        end -= 1;
    }

    &buffer[..end]
}
