// src/printer/report.rs

//! Report files of [`EventRecord`s] and [`KeywordHit`s].
//!
//! A report is written to `{output_dir}/{prefix}_{YYYYmmdd_HHMMSS}.{ext}`.
//! Nothing is written when there is nothing to report.
//!
//! [`EventRecord`s]: crate::data::event::EventRecord
//! [`KeywordHit`s]: crate::data::keyword::KeywordHit

use std::fs::{
    create_dir_all,
    File,
};
use std::io::{
    BufWriter,
    Result,
    Write,
};
use std::path::PathBuf;

use ::serde::Serialize;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::common::{
    FPath,
    LineNumber,
};
use crate::data::datetime::{
    DateTimeL,
    REPORT_FILENAME_DATETIME_FORMAT,
};
use crate::data::event::EventRecord;
use crate::data::keyword::KeywordHit;
use crate::readers::helpers::{
    fpath_to_path,
    path_to_fpath,
};

/// Default report file name prefix.
pub const REPORT_PREFIX_DEFAULT: &str = "suspicious";

/// Default directory of report files.
pub const REPORT_DIR_DEFAULT: &str = "output";

/// Report file formats.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReportFormat {
    /// columns `line,date,type,user,ip,message`, one row per record
    #[default]
    Csv,
    /// one message per line
    Txt,
}

impl ReportFormat {
    /// file name extension, without the dot
    pub const fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Txt => "txt",
        }
    }
}

/// One row of a CSV report. Field order is column order.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    line: LineNumber,
    date: String,
    #[serde(rename = "type")]
    event_type: &'a str,
    user: &'a str,
    ip: &'a str,
    message: &'a str,
}

impl<'a> From<&'a EventRecord> for ReportRow<'a> {
    fn from(record: &'a EventRecord) -> Self {
        ReportRow {
            line: record.line_number(),
            date: record.date_string(),
            event_type: record.event_type(),
            user: record.user(),
            ip: record.address(),
            message: record.message(),
        }
    }
}

/// The report file path for a report generated at `now`.
pub fn report_fpath(
    output_dir: &FPath,
    prefix: &str,
    format: ReportFormat,
    now: &DateTimeL,
) -> FPath {
    let file_name: String = format!(
        "{}_{}.{}",
        prefix,
        now.format(REPORT_FILENAME_DATETIME_FORMAT),
        format.extension()
    );
    let pathb: PathBuf = fpath_to_path(output_dir).join(file_name);

    path_to_fpath(&pathb)
}

/// Write `records` as CSV with a header row.
pub fn write_records_csv<W: Write>(
    writer: W,
    records: &[EventRecord],
) -> Result<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);
    if records.is_empty() {
        csv_writer.write_record(["line", "date", "type", "user", "ip", "message"])?;
    }
    for record in records.iter() {
        csv_writer.serialize(ReportRow::from(record))?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// Write the message of each of `records`, one per line.
pub fn write_records_txt<W: Write>(
    mut writer: W,
    records: &[EventRecord],
) -> Result<()> {
    for record in records.iter() {
        writeln!(writer, "{}", record.message())?;
    }
    writer.flush()
}

/// Write each of `hits` as `line_number: line`.
pub fn write_keyword_hits<W: Write>(
    mut writer: W,
    hits: &[KeywordHit],
) -> Result<()> {
    for hit in hits.iter() {
        writeln!(writer, "{}", hit)?;
    }
    writer.flush()
}

/// Create the report file within `output_dir`, creating `output_dir` if
/// needed.
fn create_report_file(
    output_dir: &FPath,
    prefix: &str,
    format: ReportFormat,
    now: &DateTimeL,
) -> Result<(FPath, BufWriter<File>)> {
    create_dir_all(fpath_to_path(output_dir))?;
    let fpath: FPath = report_fpath(output_dir, prefix, format, now);
    defñ!("create {:?}", fpath);
    let file: File = File::create(fpath_to_path(&fpath))?;

    Ok((fpath, BufWriter::new(file)))
}

/// Write a report of `records`. Returns the path written, or `None` if
/// `records` is empty and nothing was written.
pub fn write_report(
    records: &[EventRecord],
    output_dir: &FPath,
    prefix: &str,
    format: ReportFormat,
    now: &DateTimeL,
) -> Result<Option<FPath>> {
    defn!("({} records, {:?}, {:?}, {:?})", records.len(), output_dir, prefix, format);
    if records.is_empty() {
        defx!("no records; no report");
        return Ok(None);
    }
    let (fpath, writer) = create_report_file(output_dir, prefix, format, now)?;
    match format {
        ReportFormat::Csv => write_records_csv(writer, records)?,
        ReportFormat::Txt => write_records_txt(writer, records)?,
    }
    defx!("wrote {:?}", fpath);

    Ok(Some(fpath))
}

/// Write a text report of keyword `hits`. Returns the path written, or
/// `None` if `hits` is empty and nothing was written.
pub fn write_keyword_report(
    hits: &[KeywordHit],
    output_dir: &FPath,
    prefix: &str,
    now: &DateTimeL,
) -> Result<Option<FPath>> {
    defn!("({} hits, {:?}, {:?})", hits.len(), output_dir, prefix);
    if hits.is_empty() {
        defx!("no hits; no report");
        return Ok(None);
    }
    let (fpath, writer) = create_report_file(output_dir, prefix, ReportFormat::Txt, now)?;
    write_keyword_hits(writer, hits)?;
    defx!("wrote {:?}", fpath);

    Ok(Some(fpath))
}
