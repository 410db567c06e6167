//! The schedule artifact: one record per line, fields separated by `;`.
//!
//! ```text
//! Part I
//! Week 1
//! 2016-08-23;Intro;HW0;HW1 due (2016-08-24)
//! 2016-08-25;Labor Day - No Class;;
//! ```
//!
//! A line with a single field is a header (`Week N` or a part title); a data
//! line always has four fields, with `,` separating items inside the
//! assignments and reminders fields. A part header with a blank title is not
//! written, since the reader would skip the empty line anyway.

use super::{PersistenceError, PersistenceResult, ScheduleStore};
use crate::schedule::{ClassRow, ScheduleRecord};
use chrono::NaiveDate;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const DELIMITER: u8 = b';';

pub fn write_schedule<W: Write>(records: &[ScheduleRecord], writer: W) -> PersistenceResult<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    for record in records {
        match record {
            ScheduleRecord::PartHeader { text } if text.trim().is_empty() => {
                debug!("skipping part header with empty title");
            }
            ScheduleRecord::PartHeader { text } => writer.write_record([text.as_str()])?,
            ScheduleRecord::WeekHeader { week_number } => {
                writer.write_record([format!("Week {week_number}")])?
            }
            ScheduleRecord::ClassRow(row) => writer.write_record(row.fields())?,
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn save_schedule<P: AsRef<Path>>(records: &[ScheduleRecord], path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    write_schedule(records, file)
}

pub fn read_schedule<R: Read>(reader: R) -> PersistenceResult<Vec<ScheduleRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);
    let mut records = Vec::new();
    for line in reader.records() {
        records.push(parse_line(&line?)?);
    }
    Ok(records)
}

pub fn load_schedule<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<ScheduleRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PersistenceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_schedule(file)
}

fn parse_line(line: &StringRecord) -> PersistenceResult<ScheduleRecord> {
    let fields: Vec<&str> = line.iter().map(str::trim).collect();
    match fields.as_slice() {
        [header] => Ok(parse_header(header)),
        [date, topic, assignments, reminders] => {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                PersistenceError::InvalidData(format!("invalid date '{date}': {e}"))
            })?;
            Ok(ScheduleRecord::ClassRow(ClassRow {
                date,
                topic: topic.to_string(),
                assignments: split_list(assignments),
                reminders: split_list(reminders),
            }))
        }
        other => Err(PersistenceError::InvalidData(format!(
            "schedule line has {} fields, expected 1 or 4: '{}'",
            other.len(),
            other.join(";")
        ))),
    }
}

fn parse_header(text: &str) -> ScheduleRecord {
    let week_number = text
        .strip_prefix("Week ")
        .and_then(|n| n.trim().parse::<u32>().ok());
    match week_number {
        Some(week_number) => ScheduleRecord::WeekHeader { week_number },
        None => ScheduleRecord::PartHeader {
            text: text.to_string(),
        },
    }
}

fn split_list(input: &str) -> Vec<String> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    input.split(',').map(|s| s.trim().to_string()).collect()
}

/// A schedule artifact on disk.
#[derive(Debug, Clone)]
pub struct ScheduleFile {
    path: PathBuf,
}

impl ScheduleFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScheduleStore for ScheduleFile {
    fn save_schedule(&self, records: &[ScheduleRecord]) -> PersistenceResult<()> {
        save_schedule(records, &self.path)
    }

    fn load_schedule(&self) -> PersistenceResult<Vec<ScheduleRecord>> {
        load_schedule(&self.path)
    }
}
