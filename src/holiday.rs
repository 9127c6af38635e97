//! Holiday records, yearly datasets and request dates

use crate::error::{PoyaError, PoyaResult};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Date layout used by dataset files and responses
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One dataset entry as written by the calendar converter
#[derive(Debug, Deserialize)]
struct RawHoliday {
    uid: Option<String>,
    summary: Option<String>,
    categories: Option<Vec<String>>,
    start: Option<String>,
    end: Option<String>,
}

/// Why a dataset entry was left out of matching or listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSkip {
    /// Entry is not an object of the expected shape
    Shape(String),
    /// Required field absent
    MissingField(&'static str),
    /// Field present but not a `YYYY-MM-DD` date
    BadDate { field: &'static str, value: String },
    /// `end` is not after `start`
    EmptyInterval,
}

impl fmt::Display for RecordSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape(reason) => write!(f, "malformed entry: {}", reason),
            Self::MissingField(field) => write!(f, "missing field '{}'", field),
            Self::BadDate { field, value } => write!(f, "unparsable {} date '{}'", field, value),
            Self::EmptyInterval => write!(f, "end date is not after start date"),
        }
    }
}

/// A validated holiday covering the half-open interval `[start, end)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub categories: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HolidayRecord {
    /// Build a record from one dataset entry
    pub fn from_value(value: &Value) -> Result<Self, RecordSkip> {
        let raw = RawHoliday::deserialize(value).map_err(|e| RecordSkip::Shape(e.to_string()))?;

        let start = parse_field("start", raw.start.as_deref())?;
        let end = parse_field("end", raw.end.as_deref())?;
        if end <= start {
            return Err(RecordSkip::EmptyInterval);
        }

        Ok(Self {
            id: raw.uid,
            name: raw.summary,
            categories: raw.categories.unwrap_or_default(),
            start,
            end,
        })
    }

    /// `start <= date < end`
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Case-insensitive category membership
    pub fn has_category(&self, category: &str) -> bool {
        let wanted = category.to_lowercase();
        self.categories.iter().any(|c| c.to_lowercase() == wanted)
    }
}

fn parse_field(field: &'static str, value: Option<&str>) -> Result<NaiveDate, RecordSkip> {
    let value = value.ok_or(RecordSkip::MissingField(field))?;
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| RecordSkip::BadDate {
        field,
        value: value.to_string(),
    })
}

/// Records that survived parsing, plus how many did not
#[derive(Debug, Clone, Default)]
pub struct ParsedRecords {
    pub records: Vec<HolidayRecord>,
    pub skipped: usize,
}

/// The holiday entries of one calendar year, in file order
///
/// Entries are kept as loaded so the cached form is the dataset itself.
/// Parsing into [`HolidayRecord`]s happens per use.
#[derive(Debug, Clone, PartialEq)]
pub struct YearDataset {
    year: i32,
    entries: Vec<Value>,
}

impl YearDataset {
    pub fn new(year: i32, entries: Vec<Value>) -> Self {
        Self { year, entries }
    }

    /// Decode a dataset from its JSON text; anything but an array is an error
    pub fn from_json(year: i32, text: &str) -> serde_json::Result<Self> {
        let entries: Vec<Value> = serde_json::from_str(text)?;
        Ok(Self::new(year, entries))
    }

    /// Serialized form stored in the cache
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse every entry, skipping the malformed ones
    pub fn parse_records(&self) -> ParsedRecords {
        let mut parsed = ParsedRecords::default();
        for (index, entry) in self.entries.iter().enumerate() {
            match HolidayRecord::from_value(entry) {
                Ok(record) => parsed.records.push(record),
                Err(skip) => {
                    warn!(year = self.year, index, "Skipping holiday entry: {}", skip);
                    parsed.skipped += 1;
                }
            }
        }
        parsed
    }
}

/// A real calendar date built once per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedDate(NaiveDate);

impl NormalizedDate {
    /// Validate year/month/day; e.g. February 30th is rejected
    pub fn new(year: i32, month: u32, day: u32) -> PoyaResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(PoyaError::InvalidDate { year, month, day })
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// English weekday name, e.g. "Saturday"
    pub fn day_name(&self) -> String {
        self.0.format("%A").to_string()
    }

    /// Week of the year with Monday as first day, zero-padded ("00"-"53")
    pub fn week_number(&self) -> String {
        self.0.format("%W").to_string()
    }

    /// English month name, e.g. "April"
    pub fn month_name(&self) -> String {
        self.0.format("%B").to_string()
    }
}

impl fmt::Display for NormalizedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}
