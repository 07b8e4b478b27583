// src/tests/logscanner_tests.rs

//! tests for `logscanner.rs`

#![allow(non_snake_case)]

use std::io::{
    Cursor,
    ErrorKind,
};

use crate::common::FPath;
use crate::data::counters::AggregateCounters;
use crate::data::datetime::{
    DateLOpt,
    DateWindow,
};
use crate::data::keyword::KeywordMatcher;
use crate::debug::helpers::{
    create_files_and_tmpdir,
    create_temp_file_bytes_with_suffix,
    create_temp_log,
    ntf_fpath,
};
use crate::readers::helpers::path_to_fpath;
use crate::readers::logscanner::{
    scan_file,
    scan_files,
    scan_keyword_file,
    scan_keyword_path,
    scan_keyword_reader,
    scan_path,
    scan_reader,
    FailurePolicy,
    ScanOptions,
    ScanOutput,
};
use crate::readers::patternset::PatternSet;
use crate::readers::summary::ScanSummary;
use crate::tests::common::{
    patternset_from,
    patternset_known,
    ymd,
    LINE_FAILED_LOGIN,
    LINE_INVALID_USER,
    LINE_NOISE,
    LINE_SUDO_FAIL,
    LINE_SUDO_FAIL2,
    PATTERN_INVALID_USER,
};

use ::si_trace_print::stack::stack_offset_set;
use ::test_case::test_case;

fn options(
    jobs: usize,
    failure_policy: FailurePolicy,
) -> ScanOptions {
    ScanOptions {
        jobs,
        failure_policy,
        ..Default::default()
    }
}

fn scan_str(
    data: &str,
    patternset: &PatternSet,
    window: &DateWindow,
) -> ScanOutput {
    let mut cursor = Cursor::new(data.as_bytes());
    scan_reader(&mut cursor, &FPath::from("test.log"), patternset, window).unwrap()
}

fn messages(output: &ScanOutput) -> Vec<&str> {
    output
        .records
        .iter()
        .map(|r| r.message())
        .collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// scan_reader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_scan_reader_invalid_user_unbounded() {
    stack_offset_set(Some(2));
    let patternset = patternset_from(&[("invalid_user", PATTERN_INVALID_USER)]);
    let output = scan_str(LINE_INVALID_USER, &patternset, &DateWindow::UNBOUNDED);

    assert_eq!(output.records.len(), 1);
    let record = &output.records[0];
    assert_eq!(record.date(), ymd(2024, 1, 5));
    assert_eq!(record.event_type(), "invalid_user");
    assert_eq!(record.user(), "admin");
    assert_eq!(record.address(), "10.0.0.5");
    assert_eq!(record.line_number(), 1);
    assert_eq!(record.path(), "test.log");
    assert_eq!(output.counters.get("invalid_user:admin"), 1);
    assert_eq!(output.counters.len(), 1);
}

#[test]
fn test_scan_reader_window_rejects() {
    let patternset = patternset_from(&[("invalid_user", PATTERN_INVALID_USER)]);
    let window = DateWindow::new(Some(ymd(2024, 2, 1)), None);
    let output = scan_str(LINE_INVALID_USER, &patternset, &window);

    assert!(output.records.is_empty());
    assert!(output.counters.is_empty());
    assert_eq!(output.summary.rejected_window, 1);
    assert_eq!(output.summary.matched, 0);
}

#[test]
fn test_scan_reader_failed_login() {
    let output = scan_str(LINE_FAILED_LOGIN, &patternset_known(), &DateWindow::UNBOUNDED);
    assert_eq!(messages(&output), vec!["2024-02-10 - Failed login by root from 192.168.1.9"]);
    assert_eq!(output.counters.get("failed_login:root"), 1);
}

#[test]
fn test_scan_reader_empty() {
    let output = scan_str("", &patternset_known(), &DateWindow::UNBOUNDED);
    assert!(output.records.is_empty());
    assert!(output.counters.is_empty());
    assert!(output.is_empty());
    assert_eq!(output.summary.lines, 0);
    assert_eq!(output.summary.files, 1);
}

#[test]
fn test_scan_reader_line_numbers() {
    let data = format!("{}\n{}\n{}\n{}\n", LINE_NOISE, LINE_INVALID_USER, LINE_NOISE, LINE_SUDO_FAIL);
    let output = scan_str(data.as_str(), &patternset_known(), &DateWindow::UNBOUNDED);
    let line_numbers: Vec<u64> = output
        .records
        .iter()
        .map(|r| r.line_number())
        .collect();
    assert_eq!(line_numbers, vec![2, 4]);
    assert_eq!(output.summary.lines, 4);
    assert_eq!(output.summary.matched, 2);
}

#[test]
fn test_scan_reader_crlf_and_no_final_newline() {
    let data = format!("{}\r\n{}", LINE_SUDO_FAIL, LINE_SUDO_FAIL2);
    let output = scan_str(data.as_str(), &patternset_known(), &DateWindow::UNBOUNDED);
    assert_eq!(output.records.len(), 2);
    assert_eq!(output.records[0].user(), "bob");
    assert_eq!(output.records[1].user(), "bob");
    assert_eq!(output.counters.get("sudo_fail:bob"), 2);
}

#[test]
fn test_scan_reader_invalid_utf8() {
    let mut data: Vec<u8> = vec![0xFF, 0xFE, b' ', b'x', b'\n'];
    data.extend_from_slice(LINE_INVALID_USER.as_bytes());
    data.push(b'\n');
    let mut cursor = Cursor::new(data);
    let output = scan_reader(&mut cursor, &FPath::from("bin.log"), &patternset_known(), &DateWindow::UNBOUNDED)
        .unwrap();
    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].line_number(), 2);
}

#[test]
fn test_scan_reader_bad_timestamp_counted() {
    let patternset = patternset_from(&[("invalid_user", PATTERN_INVALID_USER)]);
    let output = scan_str(
        "Foo 5 2024 10:22:31 sshd: invalid user mallory from 10.0.0.9",
        &patternset,
        &DateWindow::UNBOUNDED,
    );
    assert!(output.records.is_empty());
    assert_eq!(output.summary.bad_timestamp, 1);
}

/// `end` includes the entire day.
#[test_case(None, Some(ymd(2024, 3, 3)), 1; "end same day last second")]
#[test_case(Some(ymd(2024, 3, 3)), Some(ymd(2024, 3, 3)), 1; "single day")]
#[test_case(Some(ymd(2024, 3, 4)), None, 1; "start next day")]
#[test_case(Some(ymd(2024, 3, 3)), Some(ymd(2024, 3, 4)), 2; "both days")]
#[test_case(Some(ymd(2024, 3, 5)), None, 0; "after both")]
fn test_scan_reader_window(
    start: DateLOpt,
    end: DateLOpt,
    expect: usize,
) {
    let data = format!("{}\n{}\n", LINE_SUDO_FAIL, LINE_SUDO_FAIL2);
    let output = scan_str(data.as_str(), &patternset_known(), &DateWindow::new(start, end));
    assert_eq!(output.records.len(), expect);
    assert_eq!(output.counters.total(), expect as u64);
    assert_eq!(output.summary.rejected_window, 2 - expect as u64);
}

#[test]
fn test_scan_reader_idempotent() {
    let data = format!("{}\n{}\n{}\n", LINE_INVALID_USER, LINE_FAILED_LOGIN, LINE_SUDO_FAIL);
    let patternset = patternset_known();
    let output1 = scan_str(data.as_str(), &patternset, &DateWindow::UNBOUNDED);
    let output2 = scan_str(data.as_str(), &patternset, &DateWindow::UNBOUNDED);
    assert_eq!(output1.records, output2.records);
    assert_eq!(output1.counters, output2.counters);
    assert_eq!(output1.summary, output2.summary);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// scan_file, scan_path
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_scan_file() {
    let ntf = create_temp_log(LINE_INVALID_USER);
    let fpath = ntf_fpath(&ntf);
    let output = scan_file(&fpath, &patternset_known(), &DateWindow::UNBOUNDED).unwrap();
    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].path(), &fpath);
}

#[test]
fn test_scan_path_single_file_any_suffix() {
    let ntf = create_temp_file_bytes_with_suffix(LINE_INVALID_USER.as_bytes(), ".txt");
    let fpath = ntf_fpath(&ntf);
    let output = scan_path(&fpath, &patternset_known(), &DateWindow::UNBOUNDED, &ScanOptions::default()).unwrap();
    assert_eq!(output.records.len(), 1);
}

#[test]
fn test_scan_path_single_file_missing() {
    let fpath = FPath::from("/this/path/does/not/exist.log");
    let err = scan_path(&fpath, &patternset_known(), &DateWindow::UNBOUNDED, &ScanOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.path, fpath);
    assert!(err.to_string().contains("exist.log"));
}

#[test]
fn test_scan_path_empty_file() {
    let ntf = create_temp_log("");
    let output = scan_path(&ntf_fpath(&ntf), &patternset_known(), &DateWindow::UNBOUNDED, &ScanOptions::default())
        .unwrap();
    assert!(output.records.is_empty());
    assert!(output.counters.is_empty());
    assert!(output.failures.is_empty());
}

#[test_case(1; "sequential")]
#[test_case(2; "two workers")]
#[test_case(8; "more workers than files")]
fn test_scan_path_dir_two_files_sudo_fail(jobs: usize) {
    let (tempdir, fpaths) = create_files_and_tmpdir(&[("b.log", LINE_SUDO_FAIL2), ("a.log", LINE_SUDO_FAIL)]);
    let dir: FPath = path_to_fpath(tempdir.path());
    let output = scan_path(&dir, &patternset_known(), &DateWindow::UNBOUNDED, &options(jobs, FailurePolicy::Skip))
        .unwrap();

    assert_eq!(output.counters.get("sudo_fail:bob"), 2);
    assert_eq!(output.records.len(), 2);
    // traversal order is file name order
    assert_eq!(output.records[0].path(), &fpaths[1]);
    assert_eq!(output.records[1].path(), &fpaths[0]);
    assert_eq!(output.summary.files, 2);
    assert!(output.failures.is_empty());
}

#[test]
fn test_scan_path_dir_counters_are_sum_of_files() {
    let files: &[(&str, &str)] = &[
        ("one.log", "Jan 5 2024 10:22:31 sshd: Failed password for invalid user admin from 10.0.0.5\nJan 5 2024 10:22:32 sshd: Failed password for invalid user admin from 10.0.0.5\n"),
        ("sub/two.log", "Feb 10 2024 08:01:02 sshd[123]: Failed password for root from 192.168.1.9 port 22 ssh2\n"),
        ("sub/three.log", "Jan 6 2024 10:22:31 sshd: Failed password for invalid user admin from 10.0.0.6\nnothing here\n"),
        ("skip.txt", "Jan 6 2024 10:22:31 sshd: Failed password for invalid user admin from 10.0.0.6\n"),
    ];
    let (tempdir, fpaths) = create_files_and_tmpdir(files);
    let patternset = patternset_known();
    let dir: FPath = path_to_fpath(tempdir.path());
    let output = scan_path(&dir, &patternset, &DateWindow::UNBOUNDED, &options(3, FailurePolicy::Skip)).unwrap();

    let summed: AggregateCounters = fpaths[..3]
        .iter()
        .map(|fpath| scan_file(fpath, &patternset, &DateWindow::UNBOUNDED).unwrap().counters)
        .collect();
    assert_eq!(output.counters, summed);
    assert_eq!(output.counters.get("invalid_user:admin"), 3);
    assert_eq!(output.counters.get("failed_login:root"), 1);
    assert_eq!(output.summary.files, 3);
    assert_eq!(output.summary.files_skipped, 1);
    assert_eq!(output.summary.lines, 5);
}

#[test]
fn test_scan_path_dir_jobs_do_not_change_results() {
    let mut files: Vec<(String, String)> = Vec::new();
    for i in 0..12 {
        let data = format!("Jan {} 2024 10:22:31 sshd: Failed password for invalid user u{} from 10.0.0.{}\n", i + 1, i, i);
        files.push((format!("f{:02}.log", i), data));
    }
    let files_ref: Vec<(&str, &str)> = files
        .iter()
        .map(|(n, d)| (n.as_str(), d.as_str()))
        .collect();
    let (tempdir, _fpaths) = create_files_and_tmpdir(&files_ref);
    let dir: FPath = path_to_fpath(tempdir.path());
    let patternset = patternset_known();

    let sequential = scan_path(&dir, &patternset, &DateWindow::UNBOUNDED, &options(1, FailurePolicy::Skip)).unwrap();
    let parallel = scan_path(&dir, &patternset, &DateWindow::UNBOUNDED, &options(4, FailurePolicy::Skip)).unwrap();
    assert_eq!(sequential.records.len(), 12);
    assert_eq!(sequential.records, parallel.records);
    assert_eq!(sequential.counters, parallel.counters);
    assert_eq!(sequential.summary, parallel.summary);
}

#[test]
fn test_scan_files_order() {
    let (_tempdir, fpaths) = create_files_and_tmpdir(&[("a.log", LINE_SUDO_FAIL), ("b.log", LINE_INVALID_USER)]);
    let reversed: Vec<FPath> = fpaths.iter().rev().cloned().collect();
    let output = scan_files(&reversed, &patternset_known(), &DateWindow::UNBOUNDED, &options(2, FailurePolicy::Skip))
        .unwrap();
    assert_eq!(output.records[0].event_type(), "invalid_user");
    assert_eq!(output.records[1].event_type(), "sudo_fail");
}

#[test]
fn test_scan_files_missing_skip_and_abort() {
    let (tempdir, mut fpaths) = create_files_and_tmpdir(&[("a.log", LINE_SUDO_FAIL)]);
    fpaths.insert(0, path_to_fpath(&tempdir.path().join("gone.log")));
    let patternset = patternset_known();

    let output = scan_files(&fpaths, &patternset, &DateWindow::UNBOUNDED, &options(2, FailurePolicy::Skip)).unwrap();
    assert_eq!(output.records.len(), 1);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].path, fpaths[0]);
    assert_eq!(output.summary.files_failed, 1);

    let err = scan_files(&fpaths, &patternset, &DateWindow::UNBOUNDED, &options(2, FailurePolicy::Abort)).unwrap_err();
    assert_eq!(err.path, fpaths[0]);
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[cfg(unix)]
#[test]
fn test_scan_path_dir_failure_policy_skip() {
    let (tempdir, fpaths) = create_files_and_tmpdir(&[("a.log", LINE_SUDO_FAIL), ("c.log", LINE_INVALID_USER)]);
    let link = tempdir.path().join("b.log");
    std::os::unix::fs::symlink(tempdir.path().join("no-such-target"), &link).unwrap();
    let dir: FPath = path_to_fpath(tempdir.path());

    let output = scan_path(&dir, &patternset_known(), &DateWindow::UNBOUNDED, &options(2, FailurePolicy::Skip)).unwrap();
    assert_eq!(output.records.len(), 2);
    assert_eq!(output.records[0].path(), &fpaths[0]);
    assert_eq!(output.records[1].path(), &fpaths[1]);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].path, path_to_fpath(&link));
    assert_eq!(output.summary.files, 2);
    assert_eq!(output.summary.files_failed, 1);
}

#[cfg(unix)]
#[test]
fn test_scan_path_dir_failure_policy_abort() {
    let (tempdir, _fpaths) = create_files_and_tmpdir(&[("a.log", LINE_SUDO_FAIL), ("c.log", LINE_INVALID_USER)]);
    let link = tempdir.path().join("b.log");
    std::os::unix::fs::symlink(tempdir.path().join("no-such-target"), &link).unwrap();
    let dir: FPath = path_to_fpath(tempdir.path());

    let err = scan_path(&dir, &patternset_known(), &DateWindow::UNBOUNDED, &options(2, FailurePolicy::Abort))
        .unwrap_err();
    assert_eq!(err.path, path_to_fpath(&link));
}

#[test]
fn test_ScanOptions_default() {
    let options = ScanOptions::default();
    assert_eq!(options.suffix, ".log");
    assert_eq!(options.failure_policy, FailurePolicy::Skip);
    assert!(options.jobs >= 1);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// keyword scanning
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_scan_keyword_reader() {
    let data = "  Failed password for root  \nAccepted password for alice\nFAILED again\n";
    let mut cursor = Cursor::new(data.as_bytes());
    let output = scan_keyword_reader(&mut cursor, &FPath::from("k.log"), &KeywordMatcher::new("failed")).unwrap();
    let rendered: Vec<String> = output
        .hits
        .iter()
        .map(|h| h.to_string())
        .collect();
    assert_eq!(rendered, vec!["1: Failed password for root", "3: FAILED again"]);
    assert_eq!(
        output.summary,
        ScanSummary {
            files: 1,
            lines: 3,
            matched: 2,
            ..Default::default()
        }
    );
}

#[test]
fn test_scan_keyword_file_no_hits() {
    let ntf = create_temp_log(LINE_NOISE);
    let output = scan_keyword_file(&ntf_fpath(&ntf), &KeywordMatcher::new("sudo")).unwrap();
    assert!(output.is_empty());
}

#[test]
fn test_scan_keyword_path_dir() {
    let (tempdir, fpaths) = create_files_and_tmpdir(&[
        ("b.log", "nothing\nsudo: auth failure\n"),
        ("a.log", "SUDO used\n"),
        ("c.txt", "sudo ignored\n"),
    ]);
    let dir: FPath = path_to_fpath(tempdir.path());
    let output = scan_keyword_path(&dir, &KeywordMatcher::new("sudo"), &options(2, FailurePolicy::Skip)).unwrap();
    assert_eq!(output.hits.len(), 2);
    assert_eq!(output.hits[0].path, fpaths[1]);
    assert_eq!(output.hits[0].line_number, 1);
    assert_eq!(output.hits[1].path, fpaths[0]);
    assert_eq!(output.hits[1].line_number, 2);
    assert_eq!(output.summary.files_skipped, 1);
}

#[test]
fn test_scan_keyword_path_missing_file() {
    let fpath = FPath::from("/this/path/does/not/exist.log");
    let err = scan_keyword_path(&fpath, &KeywordMatcher::new("x"), &ScanOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
