// src/bin/als.rs

//! Driver program _als_ drives the [_alslib_].
//!
//! Processes user-passed command-line arguments.
//! Loads the pattern configuration, then scans the passed log file or
//! directory. Directories are enumerated for files with the recognized
//! suffix and each file is scanned by a worker thread.
//!
//! Matching events are printed to stdout along with the aggregate counters,
//! and written to a report file.
//!
//! If passed CLI option `--keyword`, lines containing the keyword are
//! reported instead, without use of patterns or date filters.
//!
//! If passed CLI option `--summary`, a [`ScanSummary`] is printed to stderr.
//!
//! `als.rs` is the only place that prints to STDOUT.
//!
//! [_alslib_]: alslib
//! [`ScanSummary`]: alslib::readers::summary::ScanSummary

#![allow(non_camel_case_types)]

use std::process::ExitCode;

use ::anyhow::{
    Context,
    Result,
};
use ::chrono::Local;
use ::clap::{
    Parser,
    ValueEnum,
};
use ::const_format::concatcp;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
    stack::stack_offset_set,
};

use ::alslib::common::{
    FPath,
    CONFIG_PATH_DEFAULT,
    FILE_SUFFIX_DEFAULT,
};
use ::alslib::data::datetime::{
    datel_parse_from_str,
    DateL,
    DateLOpt,
    DateTimeL,
    DateWindow,
    CLI_DATE_FORMAT,
};
use ::alslib::data::keyword::KeywordMatcher;
use ::alslib::debug::printers::e_err;
use ::alslib::printer::printers::{
    print_error_stderr,
    print_keyword_hits,
    print_records,
    ColorChoice,
    StandardStream,
};
use ::alslib::printer::report::{
    write_keyword_report,
    write_report,
    ReportFormat,
    REPORT_DIR_DEFAULT,
    REPORT_PREFIX_DEFAULT,
};
use ::alslib::printer::summary::print_summary;
use ::alslib::readers::logscanner::{
    jobs_default,
    scan_keyword_path,
    scan_path,
    FailurePolicy,
    ScanFailures,
    ScanOptions,
};
use ::alslib::readers::patternset::PatternSet;
use ::alslib::readers::summary::ScanSummary;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// command-line parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// CLI enum that maps to [`termcolor::ColorChoice`].
///
/// [`termcolor::ColorChoice`]: https://docs.rs/termcolor/1.1.3/termcolor/enum.ColorChoice.html
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    ValueEnum, // from `clap`
)]
enum CLI_Color_Choice {
    always,
    auto,
    never,
}

/// CLI enum that maps to [`ReportFormat`].
///
/// [`ReportFormat`]: alslib::printer::report::ReportFormat
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    ValueEnum, // from `clap`
)]
enum CLI_Report_Format {
    csv,
    txt,
}

const CLI_HELP_AFTER: &str = concatcp!(
    r#"
Patterns are read from the [patterns] table of the TOML file CONFIG.
Each entry is name = 'regex'. Entries are tried in file order; the first
pattern that matches a line and captures a valid timestamp classifies the
line.

A pattern captures by position, or by name:
    group 1 or (?P<timestamp>…)  timestamp "Mon DD YYYY HH:MM:SS", required
    group 2 or (?P<user>…)       user, optional
    group 3 or (?P<ip>…)         source address, optional

Pattern names failed_login, invalid_user, and sudo_fail have their own
messages. Other names are reported as "Matched NAME".

Date filters --start and --end are inclusive and in the form "#, CLI_DATE_FORMAT, r#".
The --end date includes the entire day.

Reports are written to OUTPUT_DIR/OUTPUT_YYYYmmdd_HHMMSS.csv (or .txt).
No report is written when nothing is found.

---

Version: "#,
    env!("CARGO_PKG_VERSION"),
    r#"
MSRV: "#,
    env!("CARGO_PKG_RUST_VERSION"),
    r#"
License: "#,
    env!("CARGO_PKG_LICENSE"),
    r#"
"#
);

/// clap command-line arguments build-time definitions.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "als",
    // write expanded information for the `--version` output
    version = concatcp!(
        "(authlog scanner)\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path of a log file or a directory.
    /// Directories will be recursed. Symlinks will be followed.
    #[clap(required = true, verbatim_doc_comment)]
    logfile: String,

    /// Only report events on or after this date.
    #[clap(
        long,
        verbatim_doc_comment,
        value_parser = cli_process_date,
        conflicts_with = "keyword",
    )]
    start: Option<DateL>,

    /// Only report events on or before this date.
    #[clap(
        long,
        verbatim_doc_comment,
        value_parser = cli_process_date,
        conflicts_with = "keyword",
    )]
    end: Option<DateL>,

    /// Path of the TOML pattern configuration.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value_t = String::from(CONFIG_PATH_DEFAULT),
    )]
    config: String,

    /// Use the built-in patterns instead of reading CONFIG.
    #[clap(long = "default-patterns", verbatim_doc_comment)]
    default_patterns: bool,

    /// Report file name prefix.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value_t = String::from(REPORT_PREFIX_DEFAULT),
    )]
    output: String,

    /// Directory of report files. Created if missing.
    #[clap(
        long = "output-dir",
        verbatim_doc_comment,
        default_value_t = String::from(REPORT_DIR_DEFAULT),
    )]
    output_dir: String,

    /// Report file format.
    #[clap(
        long,
        verbatim_doc_comment,
        value_enum,
        default_value_t = CLI_Report_Format::csv,
    )]
    format: CLI_Report_Format,

    /// File name suffix of files to scan within a directory.
    /// An empty value scans every file.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value_t = String::from(FILE_SUFFIX_DEFAULT),
    )]
    suffix: String,

    /// Number of files scanned at once. Default is the available
    /// parallelism.
    #[clap(
        short = 'j',
        long,
        verbatim_doc_comment,
        value_parser = clap::value_parser!(u16).range(1..),
    )]
    jobs: Option<u16>,

    /// Stop a directory scan on the first file that cannot be read.
    /// Otherwise unreadable files are skipped with a warning.
    #[clap(long, verbatim_doc_comment)]
    strict: bool,

    /// Report lines containing KEYWORD, ignoring case, instead of
    /// pattern matches. Patterns and date filters are not used.
    #[clap(
        short = 'k',
        long,
        verbatim_doc_comment,
    )]
    keyword: Option<String>,

    /// Print a summary of scanning to stderr.
    #[clap(short = 's', long, verbatim_doc_comment)]
    summary: bool,

    /// Choose to print to terminal using colors.
    #[clap(
        required = false,
        short = 'c',
        long = "color",
        verbatim_doc_comment,
        value_enum,
        default_value_t = CLI_Color_Choice::auto,
    )]
    color_choice: CLI_Color_Choice,
}

/// `clap` argument processor for `--start` and `--end`.
fn cli_process_date(date: &str) -> std::result::Result<DateL, String> {
    match datel_parse_from_str(date) {
        Ok(val) => Ok(val),
        Err(err) => Err(format!("expected date in the form {:?}; {}", CLI_DATE_FORMAT, err)),
    }
}

/// Options resolved from [`CLI_Args`].
#[derive(Debug)]
struct Run {
    logfile: FPath,
    window: DateWindow,
    config: FPath,
    default_patterns: bool,
    output: String,
    output_dir: FPath,
    format: ReportFormat,
    scan_options: ScanOptions,
    keyword: Option<String>,
    summary: bool,
    color_choice: ColorChoice,
}

fn cli_process_args() -> Result<Run> {
    let args = CLI_Args::parse();
    defo!("args {:?}", args);

    let start: DateLOpt = args.start;
    let end: DateLOpt = args.end;
    let window: DateWindow = DateWindow::try_new(start, end).context("invalid --start and --end")?;
    defo!("window {:?}", window);

    let color_choice: ColorChoice = match args.color_choice {
        CLI_Color_Choice::always => ColorChoice::Always,
        CLI_Color_Choice::auto => ColorChoice::Auto,
        CLI_Color_Choice::never => ColorChoice::Never,
    };
    let format: ReportFormat = match args.format {
        CLI_Report_Format::csv => ReportFormat::Csv,
        CLI_Report_Format::txt => ReportFormat::Txt,
    };
    let failure_policy: FailurePolicy = match args.strict {
        true => FailurePolicy::Abort,
        false => FailurePolicy::Skip,
    };
    let jobs: usize = match args.jobs {
        Some(val) => val as usize,
        None => jobs_default(),
    };

    Ok(Run {
        logfile: args.logfile,
        window,
        config: args.config,
        default_patterns: args.default_patterns,
        output: args.output,
        output_dir: args.output_dir,
        format,
        scan_options: ScanOptions {
            suffix: args.suffix,
            failure_policy,
            jobs,
        },
        keyword: args.keyword,
        summary: args.summary,
        color_choice,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// processing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn print_summary_stderr(
    run: &Run,
    summary: &ScanSummary,
    failures: &ScanFailures,
) -> Result<()> {
    if !run.summary {
        return Ok(());
    }
    let stderr = StandardStream::stderr(run.color_choice);
    let mut stderr_lock = stderr.lock();
    print_summary(&mut stderr_lock, summary, failures).context("failed to print summary")
}

/// Scan for pattern matches, print them, write the report.
fn run_patterns(
    run: &Run,
    now: &DateTimeL,
) -> Result<()> {
    defn!();
    let patternset: PatternSet = match run.default_patterns {
        true => PatternSet::default_patterns(),
        false => PatternSet::load_file(&run.config)?,
    };
    defo!("patterns {:?}", patternset.names());

    let output = scan_path(&run.logfile, &patternset, &run.window, &run.scan_options)?;

    let stdout = StandardStream::stdout(run.color_choice);
    let mut stdout_lock = stdout.lock();
    print_records(&mut stdout_lock, &output.records, &output.counters).context("failed to print results")?;
    drop(stdout_lock);

    if let Some(fpath) = write_report(&output.records, &run.output_dir, &run.output, run.format, now)
        .with_context(|| format!("failed to write report in {:?}", run.output_dir))?
    {
        println!("Report written to {}", fpath);
    }
    print_summary_stderr(run, &output.summary, &output.failures)?;
    defx!();

    Ok(())
}

/// Scan for lines with `keyword`, print them, write the report.
fn run_keyword(
    run: &Run,
    keyword: &str,
    now: &DateTimeL,
) -> Result<()> {
    defn!("({:?})", keyword);
    let matcher = KeywordMatcher::new(keyword);
    let output = scan_keyword_path(&run.logfile, &matcher, &run.scan_options)?;

    let stdout = StandardStream::stdout(run.color_choice);
    let mut stdout_lock = stdout.lock();
    print_keyword_hits(&mut stdout_lock, &output.hits).context("failed to print results")?;
    drop(stdout_lock);

    if let Some(fpath) = write_keyword_report(&output.hits, &run.output_dir, &run.output, now)
        .with_context(|| format!("failed to write report in {:?}", run.output_dir))?
    {
        println!("Report written to {}", fpath);
    }
    print_summary_stderr(run, &output.summary, &output.failures)?;
    defx!();

    Ok(())
}

pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();

    let run: Run = match cli_process_args() {
        Ok(val) => val,
        Err(err) => {
            e_err!("{:#}", err);
            defx!("bad arguments");
            return ExitCode::FAILURE;
        }
    };
    let now: DateTimeL = Local::now().naive_local();

    let result: Result<()> = match run.keyword.as_deref() {
        Some(keyword) => run_keyword(&run, keyword, &now),
        None => run_patterns(&run, &now),
    };
    let exitcode: ExitCode = match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            if print_error_stderr(run.color_choice, format!("{:#}", err).as_str()).is_err() {
                e_err!("{:#}", err);
            }
            ExitCode::FAILURE
        }
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}
