// src/tests/common.rs

//! Common data for tests.

#![allow(dead_code)]

use crate::data::datetime::{
    DateL,
    DateTimeL,
    NaiveDate,
};
use crate::readers::patternset::PatternSet;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// log lines and patterns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub const PATTERN_INVALID_USER: &str =
    r"(\w{3} \d{1,2} \d{4} \d{2}:\d{2}:\d{2}).*invalid user (\w+) from ([\d.]+)";
pub const PATTERN_FAILED_LOGIN: &str =
    r"(\w{3} \d{1,2} \d{4} \d{2}:\d{2}:\d{2}).*Failed password for (\w+) from ([\d.]+)";
pub const PATTERN_SUDO_FAIL: &str =
    r"(\w{3} \d{1,2} \d{4} \d{2}:\d{2}:\d{2}).*sudo.*authentication failure.*user=(\w+)";

pub const LINE_INVALID_USER: &str =
    "Jan 5 2024 10:22:31 sshd: Failed password for invalid user admin from 10.0.0.5";
pub const LINE_FAILED_LOGIN: &str =
    "Feb 10 2024 08:01:02 sshd[123]: Failed password for root from 192.168.1.9 port 22 ssh2";
pub const LINE_SUDO_FAIL: &str =
    "Mar 3 2024 23:59:59 host sudo: pam_unix(sudo:auth): authentication failure; logname=bob uid=1000 user=bob";
pub const LINE_SUDO_FAIL2: &str =
    "Mar 4 2024 00:00:01 host sudo: pam_unix(sudo:auth): authentication failure; logname=bob uid=1000 user=bob";
pub const LINE_NOISE: &str = "Jan 5 2024 10:22:32 sshd: Accepted publickey for alice from 10.0.0.7";

/// The three known patterns, in the order `invalid_user`, `failed_login`,
/// `sudo_fail`.
pub fn patternset_known() -> PatternSet {
    patternset_from(&[
        ("invalid_user", PATTERN_INVALID_USER),
        ("failed_login", PATTERN_FAILED_LOGIN),
        ("sudo_fail", PATTERN_SUDO_FAIL),
    ])
}

/// Build a `PatternSet` from `entries`, panicking if any entry is dropped.
pub fn patternset_from(entries: &[(&str, &str)]) -> PatternSet {
    let (patternset, errors) = PatternSet::from_entries(entries.iter().copied());
    assert!(errors.is_empty(), "unexpected PatternErrors {:?}", errors);

    patternset
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// dates
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn ymd(
    year: i32,
    month: u32,
    day: u32,
) -> DateL {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn ymdhms(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTimeL {
    ymd(year, month, day)
        .and_hms_opt(hour, min, sec)
        .unwrap()
}
