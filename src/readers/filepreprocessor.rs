// src/readers/filepreprocessor.rs

//! Functions to find the files to scan for a user-passed path.
//!
//! A directory is recursed and files are selected by file name suffix.

use crate::common::FPath;
use crate::readers::helpers::{
    fpath_to_path,
    path_has_suffix,
    path_to_fpath,
};

use std::path::Path;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FilePreProcessor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Initial path processing return type.
#[derive(Debug)]
pub enum ProcessPathResult {
    /// File should be scanned
    FileValid(FPath),
    /// File name does not end with the recognized suffix
    FileErrNotSupported(FPath),
    /// Path exists and is not a file or directory
    FileErrNotAFile(FPath),
    /// Path does not exist
    FileErrNotExist(FPath),
    /// Walking the directory failed at this path
    FileErrWalk(FPath, std::io::Error),
}

pub type ProcessPathResults = Vec<ProcessPathResult>;

impl ProcessPathResult {
    pub const fn is_valid(&self) -> bool {
        matches!(self, ProcessPathResult::FileValid(_))
    }

    pub fn fpath(&self) -> &FPath {
        match self {
            ProcessPathResult::FileValid(path)
            | ProcessPathResult::FileErrNotSupported(path)
            | ProcessPathResult::FileErrNotAFile(path)
            | ProcessPathResult::FileErrNotExist(path)
            | ProcessPathResult::FileErrWalk(path, _) => path,
        }
    }
}

/// Return a `ProcessPathResult` for each file in the `path`.
///
/// Given a directory, recurses the directory in file name order. Files
/// whose name ends with `suffix` are `FileValid`.<br/>
/// Given a plain file path, returns that path as `FileValid` regardless of
/// `suffix`; a user-passed file path should be attempted.
pub fn process_path(
    path: &FPath,
    suffix: &str,
) -> ProcessPathResults {
    defn!("({:?}, {:?})", path, suffix);

    let std_path: &Path = fpath_to_path(path);
    if std_path.is_file() {
        defx!("is_file; return FileValid({:?})", path);
        return vec![ProcessPathResult::FileValid(path.clone())];
    }
    if !std_path.exists() {
        defx!("return FileErrNotExist({:?})", path);
        return vec![ProcessPathResult::FileErrNotExist(path.clone())];
    }
    if !std_path.is_dir() {
        defx!("return FileErrNotAFile({:?})", path);
        return vec![ProcessPathResult::FileErrNotAFile(path.clone())];
    }

    let mut paths: ProcessPathResults = ProcessPathResults::new();

    defo!("WalkDir({:?})…", path);
    for entry in ::walkdir::WalkDir::new(std_path)
        .follow_links(true)
        .sort_by_file_name()
        .same_file_system(true)
    {
        let path_entry: ::walkdir::DirEntry = match entry {
            Ok(val) => val,
            Err(err) => {
                defo!("Err({:?})", err);
                let fpath_err: FPath = match err.path() {
                    Some(p) => path_to_fpath(p),
                    None => path.clone(),
                };
                paths.push(ProcessPathResult::FileErrWalk(fpath_err, err.into()));
                continue;
            }
        };
        let std_path_entry: &Path = path_entry.path();
        let fpath_entry: FPath = path_to_fpath(std_path_entry);
        let file_type = path_entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            defo!("Path not a file {:?}", path_entry);
            paths.push(ProcessPathResult::FileErrNotAFile(fpath_entry));
            continue;
        }
        if path_has_suffix(std_path_entry, suffix) {
            defo!("paths.push(FileValid({:?}))", fpath_entry);
            paths.push(ProcessPathResult::FileValid(fpath_entry));
        } else {
            defo!("Path not supported {:?}", fpath_entry);
            paths.push(ProcessPathResult::FileErrNotSupported(fpath_entry));
        }
    }
    defx!("return {} results", paths.len());

    paths
}
