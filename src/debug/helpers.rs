// src/debug/helpers.rs

//! Temporary file and directory helpers for testing.

use crate::common::FPath;

use crate::readers::helpers::path_to_fpath;

use std::fs::create_dir_all;
use std::io::Write; // for `NamedTempFile.write_all`
use std::path::PathBuf;

use ::lazy_static::lazy_static;
use ::si_trace_print::defñ;

#[doc(hidden)]
pub use ::tempfile::NamedTempFile;
#[doc(hidden)]
pub use ::tempfile::TempDir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile instances default to this file name prefix.
/// See <https://github.com/Stebalien/tempfile/issues/183>.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-als-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    path_to_fpath(ntf.path())
}

/// Testing helper function to write a `[u8]` to a temporary file with the
/// passed `suffix`.
pub fn create_temp_file_bytes_with_suffix(
    data: &[u8],
    suffix: &str,
) -> NamedTempFile {
    let mut ntf = match ::tempfile::Builder::new()
        // use known prefix for easier cleanup
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .suffix::<str>(suffix)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::new()..tempfile() return Err {}", err);
        }
    };
    match ntf.write_all(data) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }

    ntf
}

/// Testing helper function to write a `str` to a temporary `.log` file.
pub fn create_temp_log(data: &str) -> NamedTempFile {
    create_temp_file_bytes_with_suffix(data.as_bytes(), ".log")
}

/// Testing helper function to write a `str` to a temporary file with the
/// passed `suffix`.
pub fn create_temp_file_with_suffix(
    data: &str,
    suffix: &str,
) -> NamedTempFile {
    create_temp_file_bytes_with_suffix(data.as_bytes(), suffix)
}

/// Create a temporary directory
pub fn create_temp_dir() -> TempDir {
    defñ!();
    match ::tempfile::Builder::new()
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempdir()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::new()..tempdir() return Err {}", err);
        }
    }
}

/// Testing helper function to write `data` to file `name` within `tempdir`.
/// Leading directories in `name` are created, e.g. `name` value `foo/bar.log`
/// creates directory `foo` and file `bar.log`.
pub fn create_file_in_tmpdir(
    data: &str,
    name: &str,
    tempdir: &TempDir,
) -> FPath {
    let pathb: PathBuf = tempdir.path().join(name);
    if let Some(parent) = pathb.parent() {
        if let Err(err) = create_dir_all(parent) {
            panic!("create_dir_all({:?}) Error {:?}", parent, err);
        }
    }
    defñ!("write {:?}", pathb);
    if let Err(err) = std::fs::write(&pathb, data) {
        panic!("std::fs::write({:?}) Error {:?}", pathb, err);
    }

    path_to_fpath(&pathb)
}

/// Create a temporary directory holding the passed `(name, data)` files.
pub fn create_files_and_tmpdir(files: &[(&str, &str)]) -> (TempDir, Vec<FPath>) {
    let tempdir: TempDir = create_temp_dir();
    let fpaths: Vec<FPath> = files
        .iter()
        .map(|(name, data)| create_file_in_tmpdir(data, name, &tempdir))
        .collect();

    (tempdir, fpaths)
}
