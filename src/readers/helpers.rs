// src/readers/helpers.rs

//! Miscellaneous helper functions for _Readers_.

use crate::common::FPath;

/// Helper function for a slightly annoying set of calls.
pub fn path_to_fpath(path: &std::path::Path) -> FPath {
    // `PathBuf` to `String` https://stackoverflow.com/q/37388107/471376
    (*(path.to_string_lossy())).to_string()
}

/// Helper function for completeness.
pub fn fpath_to_path(path: &FPath) -> &std::path::Path {
    std::path::Path::new(path)
}

/// Does the file name of `path` end with `suffix`?
///
/// An empty `suffix` matches every file.
pub fn path_has_suffix(
    path: &std::path::Path,
    suffix: &str,
) -> bool {
    if suffix.is_empty() {
        return true;
    }
    match path.file_name() {
        Some(file_name) => file_name
            .to_string_lossy()
            .ends_with(suffix),
        None => false,
    }
}
