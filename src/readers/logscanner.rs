// src/readers/logscanner.rs

//! Implements the scanning functions that drive a [`LineClassifier`] over a
//! file, or over every recognized file in a directory tree.
//!
//! Scanning a file is stateless per line. The only state accumulated is the
//! ordered [`EventRecord`s] and the [`AggregateCounters`].
//!
//! Files of a directory are scanned by a bounded pool of worker threads.
//! Results are re-assembled in directory traversal order so output does not
//! depend on the number of workers.
//!
//! [`LineClassifier`]: crate::readers::classifier::LineClassifier
//! [`EventRecord`s]: crate::data::event::EventRecord
//! [`AggregateCounters`]: crate::data::counters::AggregateCounters

use std::fmt;
use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
    Error,
    ErrorKind,
    Result,
};
use std::thread;

use ::more_asserts::debug_assert_lt;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::common::{
    trim_line_ending,
    Count,
    FPath,
    LineNumber,
    NLu8,
    FILE_SUFFIX_DEFAULT,
};
use crate::data::counters::AggregateCounters;
use crate::data::datetime::DateWindow;
use crate::data::event::{
    EventRecord,
    EventRecords,
};
use crate::data::keyword::{
    KeywordHit,
    KeywordHits,
    KeywordMatcher,
};
use crate::debug::printers::{
    e_err,
    e_wrn,
};
use crate::readers::classifier::{
    Classification,
    LineClassifier,
};
use crate::readers::filepreprocessor::{
    process_path,
    ProcessPathResult,
};
use crate::readers::helpers::fpath_to_path;
use crate::readers::patternset::PatternSet;
use crate::readers::summary::ScanSummary;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// options and errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What a directory scan does when a file cannot be read.
///
/// A single-file scan always fails on a read error.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FailurePolicy {
    /// print a warning, record the failure, continue with the other files
    #[default]
    Skip,
    /// fail the whole scan with the first failure in traversal order
    Abort,
}

/// Options for directory scans.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScanOptions {
    /// file name suffix of files to scan within a directory
    pub suffix: String,
    pub failure_policy: FailurePolicy,
    /// number of worker threads; `1` scans sequentially on the calling thread
    pub jobs: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            suffix: String::from(FILE_SUFFIX_DEFAULT),
            failure_policy: FailurePolicy::default(),
            jobs: jobs_default(),
        }
    }
}

/// Default worker count, the available parallelism.
pub fn jobs_default() -> usize {
    match thread::available_parallelism() {
        Ok(val) => val.get(),
        Err(_err) => 1,
    }
}

/// A file that could not be scanned.
#[derive(Debug)]
pub struct ScanError {
    pub path: FPath,
    pub error: Error,
}

pub type ScanFailures = Vec<ScanError>;

impl ScanError {
    pub fn new(
        path: FPath,
        error: Error,
    ) -> ScanError {
        ScanError { path, error }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "failed to scan {:?}: {}", self.path, self.error)
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// scan outputs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Output of scanning one or more files that can be combined in traversal
/// order.
pub trait ScanMerge: Default + Send {
    /// Append `other`, which was scanned after `self`.
    fn merge(
        &mut self,
        other: Self,
    );

    fn failures_mut(&mut self) -> &mut ScanFailures;

    fn summary_mut(&mut self) -> &mut ScanSummary;
}

/// Output of a pattern scan.
#[derive(Debug, Default)]
pub struct ScanOutput {
    /// records in scan order; ascending line number within each file
    pub records: EventRecords,
    pub counters: AggregateCounters,
    /// files of a directory scan that were skipped by `FailurePolicy::Skip`
    pub failures: ScanFailures,
    pub summary: ScanSummary,
}

impl ScanOutput {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ScanMerge for ScanOutput {
    fn merge(
        &mut self,
        other: Self,
    ) {
        self.records.extend(other.records);
        self.counters.merge(other.counters);
        self.failures.extend(other.failures);
        self.summary.merge(&other.summary);
    }

    fn failures_mut(&mut self) -> &mut ScanFailures {
        &mut self.failures
    }

    fn summary_mut(&mut self) -> &mut ScanSummary {
        &mut self.summary
    }
}

/// Output of a keyword scan.
#[derive(Debug, Default)]
pub struct KeywordOutput {
    pub hits: KeywordHits,
    pub failures: ScanFailures,
    pub summary: ScanSummary,
}

impl KeywordOutput {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

impl ScanMerge for KeywordOutput {
    fn merge(
        &mut self,
        other: Self,
    ) {
        self.hits.extend(other.hits);
        self.failures.extend(other.failures);
        self.summary.merge(&other.summary);
    }

    fn failures_mut(&mut self) -> &mut ScanFailures {
        &mut self.failures
    }

    fn summary_mut(&mut self) -> &mut ScanSummary {
        &mut self.summary
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// line reading
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Call `process_line` for each line of `reader` with the one-based line
/// number. Line endings are removed. Invalid UTF-8 is replaced with
/// `U+FFFD` rather than failing the file.
fn for_each_line<R, F>(
    reader: &mut R,
    mut process_line: F,
) -> Result<LineNumber>
where
    R: BufRead,
    F: FnMut(LineNumber, &str),
{
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    let mut line_number: LineNumber = 0;
    loop {
        buffer.clear();
        if reader.read_until(NLu8, &mut buffer)? == 0 {
            break;
        }
        line_number += 1;
        let line = String::from_utf8_lossy(trim_line_ending(&buffer));
        process_line(line_number, &line);
    }

    Ok(line_number)
}

fn open_reader(path: &FPath) -> Result<BufReader<File>> {
    defñ!("({:?})", path);
    let file: File = File::open(fpath_to_path(path))?;
    if file.metadata()?.is_dir() {
        return Err(Error::new(ErrorKind::Other, "is a directory"));
    }

    Ok(BufReader::new(file))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// pattern scanning
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Scan the lines of `reader`. `path` is recorded in each [`EventRecord`].
///
/// Each line is classified, then the classification's timestamp is checked
/// against `window`. Accepted lines become records and increment their
/// counter key. Rejected lines are silently dropped.
pub fn scan_reader<R: BufRead>(
    reader: &mut R,
    path: &FPath,
    patternset: &PatternSet,
    window: &DateWindow,
) -> Result<ScanOutput> {
    defn!("({:?})", path);
    let mut classifier: LineClassifier = LineClassifier::new(patternset);
    let mut output = ScanOutput::default();
    let mut line_number_last: LineNumber = 0;
    for_each_line(reader, |line_number: LineNumber, line: &str| {
        debug_assert_lt!(line_number_last, line_number, "line numbers must ascend");
        line_number_last = line_number;
        let classification: Classification = match classifier.classify(line) {
            Some(val) => val,
            None => return,
        };
        if !window.contains(&classification.datetime) {
            defo!("line {} outside window {:?}", line_number, classification.datetime);
            return;
        }
        let record: EventRecord = classification.into_event_record(path.clone(), line_number);
        output
            .counters
            .increment(record.counter_key());
        output.records.push(record);
    })?;
    output.summary = ScanSummary::from_classifier(&classifier.summary(), output.records.len() as Count);
    defx!("{:?}: {} records", path, output.records.len());

    Ok(output)
}

/// Scan one file. A file that cannot be opened or read is an error.
pub fn scan_file(
    path: &FPath,
    patternset: &PatternSet,
    window: &DateWindow,
) -> Result<ScanOutput> {
    let mut reader = open_reader(path)?;

    scan_reader(&mut reader, path, patternset, window)
}

/// Scan each of `paths` as files, combine in the order of `paths`.
pub fn scan_files(
    paths: &[FPath],
    patternset: &PatternSet,
    window: &DateWindow,
    options: &ScanOptions,
) -> std::result::Result<ScanOutput, ScanError> {
    let results = process_files_pool(paths, options.jobs, |path: &FPath| scan_file(path, patternset, window));

    combine_results(paths, results, ScanOutput::default(), options.failure_policy)
}

/// Scan a file, or every file within a directory tree whose name ends with
/// `options.suffix`.
///
/// For a file, a read error is returned.<br/>
/// For a directory, a read error is handled per `options.failure_policy`.
pub fn scan_path(
    path: &FPath,
    patternset: &PatternSet,
    window: &DateWindow,
    options: &ScanOptions,
) -> std::result::Result<ScanOutput, ScanError> {
    defn!("({:?}, {:?})", path, options);
    if !fpath_to_path(path).is_dir() {
        defx!("single file");
        return scan_file(path, patternset, window).map_err(|err| ScanError::new(path.clone(), err));
    }
    let (paths, init) = preprocess_dir::<ScanOutput>(path, options)?;
    let results = process_files_pool(&paths, options.jobs, |path_: &FPath| scan_file(path_, patternset, window));
    let output = combine_results(&paths, results, init, options.failure_policy)?;
    defx!("{} records, {} failures", output.records.len(), output.failures.len());

    Ok(output)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// keyword scanning
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Find the lines of `reader` containing the keyword of `matcher`.
pub fn scan_keyword_reader<R: BufRead>(
    reader: &mut R,
    path: &FPath,
    matcher: &KeywordMatcher,
) -> Result<KeywordOutput> {
    defn!("({:?}, {:?})", path, matcher.keyword());
    let mut output = KeywordOutput::default();
    let lines: LineNumber = for_each_line(reader, |line_number: LineNumber, line: &str| {
        if matcher.is_match(line) {
            output.hits.push(KeywordHit {
                path: path.clone(),
                line_number,
                line: String::from(line.trim()),
            });
        }
    })?;
    output.summary = ScanSummary {
        files: 1,
        lines,
        matched: output.hits.len() as Count,
        ..Default::default()
    };
    defx!("{:?}: {} hits", path, output.hits.len());

    Ok(output)
}

/// Find the lines of one file containing the keyword.
pub fn scan_keyword_file(
    path: &FPath,
    matcher: &KeywordMatcher,
) -> Result<KeywordOutput> {
    let mut reader = open_reader(path)?;

    scan_keyword_reader(&mut reader, path, matcher)
}

/// Find the lines containing the keyword in a file, or in every file of a
/// directory tree whose name ends with `options.suffix`. Errors are handled
/// as in [`scan_path`].
pub fn scan_keyword_path(
    path: &FPath,
    matcher: &KeywordMatcher,
    options: &ScanOptions,
) -> std::result::Result<KeywordOutput, ScanError> {
    defn!("({:?}, {:?})", path, options);
    if !fpath_to_path(path).is_dir() {
        defx!("single file");
        return scan_keyword_file(path, matcher).map_err(|err| ScanError::new(path.clone(), err));
    }
    let (paths, init) = preprocess_dir::<KeywordOutput>(path, options)?;
    let results = process_files_pool(&paths, options.jobs, |path_: &FPath| scan_keyword_file(path_, matcher));
    let output = combine_results(&paths, results, init, options.failure_policy)?;
    defx!("{} hits, {} failures", output.hits.len(), output.failures.len());

    Ok(output)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// directory processing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Handle a failure per `failure_policy`; `Err` aborts the scan.
fn handle_failure<T: ScanMerge>(
    output: &mut T,
    failure: ScanError,
    failure_policy: FailurePolicy,
) -> std::result::Result<(), ScanError> {
    match failure_policy {
        FailurePolicy::Abort => {
            defñ!("Abort {}", failure);
            Err(failure)
        }
        FailurePolicy::Skip => {
            e_wrn!("{}; skipped", failure);
            output.summary_mut().files_failed += 1;
            output.failures_mut().push(failure);
            Ok(())
        }
    }
}

/// Enumerate the files of directory `path`. Returns the files to scan and
/// an initial output holding directory walk failures and the count of
/// skipped files.
fn preprocess_dir<T: ScanMerge>(
    path: &FPath,
    options: &ScanOptions,
) -> std::result::Result<(Vec<FPath>, T), ScanError> {
    let mut init = T::default();
    let mut paths: Vec<FPath> = Vec::new();
    for result in process_path(path, options.suffix.as_str()).into_iter() {
        match result {
            ProcessPathResult::FileValid(fpath) => paths.push(fpath),
            ProcessPathResult::FileErrNotSupported(_) => init.summary_mut().files_skipped += 1,
            ProcessPathResult::FileErrNotAFile(fpath) => {
                defo!("ignore not a file {:?}", fpath);
            }
            ProcessPathResult::FileErrNotExist(fpath) => {
                let error = Error::new(ErrorKind::NotFound, "path does not exist");
                handle_failure(&mut init, ScanError::new(fpath, error), options.failure_policy)?;
            }
            ProcessPathResult::FileErrWalk(fpath, error) => {
                handle_failure(&mut init, ScanError::new(fpath, error), options.failure_policy)?;
            }
        }
    }
    defñ!("{} files to scan", paths.len());

    Ok((paths, init))
}

/// Combine per-file `results`, ordered as `paths`, into `init`.
fn combine_results<T: ScanMerge>(
    paths: &[FPath],
    results: Vec<Result<T>>,
    init: T,
    failure_policy: FailurePolicy,
) -> std::result::Result<T, ScanError> {
    let mut output: T = init;
    for (path, result) in paths.iter().zip(results.into_iter()) {
        match result {
            Ok(output_file) => output.merge(output_file),
            Err(err) => handle_failure(&mut output, ScanError::new(path.clone(), err), failure_policy)?,
        }
    }

    Ok(output)
}

/// Run `process` for each of `paths` on up to `jobs` worker threads.
/// Returned results are in the order of `paths`.
///
/// Each file is processed by exactly one worker; a failure in one file
/// does not affect the results of another.
fn process_files_pool<T, F>(
    paths: &[FPath],
    jobs: usize,
    process: F,
) -> Vec<Result<T>>
where
    T: Send,
    F: Fn(&FPath) -> Result<T> + Sync,
{
    let jobs: usize = jobs.clamp(1, paths.len().max(1));
    defn!("({} paths, {} jobs)", paths.len(), jobs);
    if jobs == 1 {
        defx!("sequential");
        return paths
            .iter()
            .map(&process)
            .collect();
    }

    let (send_job, recv_job) = ::crossbeam_channel::unbounded::<(usize, &FPath)>();
    let (send_result, recv_result) = ::crossbeam_channel::unbounded::<(usize, Result<T>)>();
    for job in paths.iter().enumerate() {
        // the receiver is alive in this scope so `send` cannot fail
        if let Err(_err) = send_job.send(job) {
            e_err!("send_job.send(…) failed {}", _err);
        }
    }
    drop(send_job);

    let process_ref = &process;
    thread::scope(|scope| {
        for worker in 0..jobs {
            let recv_job = recv_job.clone();
            let send_result = send_result.clone();
            let name: String = format!("scan-{}", worker);
            let spawned = thread::Builder::new()
                .name(name.clone())
                .spawn_scoped(scope, move || {
                    for (index, path) in recv_job.iter() {
                        defo!("worker {:?} process {:?}", thread::current().name(), path);
                        if send_result
                            .send((index, process_ref(path)))
                            .is_err()
                        {
                            break;
                        }
                    }
                });
            if let Err(err) = spawned {
                e_err!("thread.name({:?}).spawn() failed {:?}", name, err);
            }
        }
    });
    drop(send_result);

    let mut results: Vec<Option<Result<T>>> = paths.iter().map(|_| None).collect();
    for (index, result) in recv_result.iter() {
        results[index] = Some(result);
    }
    defx!();

    results
        .into_iter()
        .map(|result| match result {
            Some(val) => val,
            None => Err(Error::new(ErrorKind::Other, "file was not processed; no worker thread")),
        })
        .collect()
}
