//! Quote-aware CSV encoding plus short-date helpers.
//!
//! # Invariants
//! - Fields containing commas, quotes or newlines are quoted on write and
//!   restored on read.
//! - The first row of every document is a header.
//! - Dates are written as `M/D/YY` without time.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SHORT_DATE_WRITE: &str = "%-m/%-d/%y";
const SHORT_DATE_READ: &str = "%m/%d/%y";
const LONG_DATE_READ: &str = "%m/%d/%Y";
const ISO_DATE: &str = "%Y-%m-%d";

pub type CsvResult<T> = Result<T, CsvError>;

#[derive(Debug)]
pub enum CsvError {
    Csv(csv::Error),
    Utf8(std::string::FromUtf8Error),
}

impl Display for CsvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "csv error: {err}"),
            Self::Utf8(err) => write!(f, "csv output is not UTF-8: {err}"),
        }
    }
}

impl Error for CsvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Utf8(err) => Some(err),
        }
    }
}

impl From<csv::Error> for CsvError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Writes a header plus rows into one CSV document.
pub fn write_document<I, R>(header: &[&str], rows: I) -> CsvResult<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(false)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| CsvError::Csv(err.into_error().into()))?;
    String::from_utf8(bytes).map_err(CsvError::Utf8)
}

/// Reads every data row after the header.
///
/// Rows are returned individually so callers can skip bad ones without
/// abandoning the whole document.
pub fn read_rows(text: &str) -> Vec<CsvResult<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    reader
        .records()
        .map(|record| {
            record
                .map(|fields| fields.iter().map(str::to_string).collect())
                .map_err(CsvError::from)
        })
        .collect()
}

/// Formats a day in the short export form, e.g. `3/7/26`.
pub fn format_short_date(date: NaiveDate) -> String {
    date.format(SHORT_DATE_WRITE).to_string()
}

/// Parses the short export form; `M/D/YYYY` and ISO `YYYY-MM-DD` are
/// accepted as well.
///
/// Two-digit years resolve into 1970..=2069, so a day exported from outside
/// that range comes back a century off. Write four digits to avoid it.
pub fn parse_short_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    [SHORT_DATE_READ, LONG_DATE_READ, ISO_DATE]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}
