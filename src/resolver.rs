//! Date → holiday resolution
//!
//! Datasets come from the cache when possible and from the data store
//! otherwise, in which case the cache is repopulated. Matching uses the
//! half-open interval `[start, end)` and returns every match.

use crate::cache::CacheStore;
use crate::error::{PoyaError, PoyaResult};
use crate::holiday::{HolidayRecord, NormalizedDate, YearDataset};
use crate::store::DataStore;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Notice attached to the single-match top-level fields
pub const DEPRECATION_NOTICE: &str = "This response structure is deprecated and will be removed in future versions. Please migrate to the new 'holidays' array format to ensure future compatibility.";

/// One holiday covering the requested date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolidayMatch {
    pub id: Option<String>,
    #[serde(rename = "holiday")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub categories: Vec<String>,
    #[serde(rename = "holiday_start")]
    pub start: NaiveDate,
    #[serde(rename = "holiday_end")]
    pub end: NaiveDate,
}

impl From<&HolidayRecord> for HolidayMatch {
    fn from(record: &HolidayRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            categories: record.categories.clone(),
            start: record.start,
            end: record.end,
        }
    }
}

/// Pre-list response fields, present only for exactly one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyFields {
    #[serde(flatten)]
    pub matched: HolidayMatch,
    pub deprecated_warning: &'static str,
}

/// Response for a date covered by at least one holiday
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolidayDetails {
    pub day: String,
    pub week: String,
    pub month: String,
    pub is_holiday: bool,
    pub count: usize,
    pub holidays: Vec<HolidayMatch>,
    #[serde(flatten)]
    pub legacy: Option<LegacyFields>,
}

/// Resolver payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HolidayPayload {
    Holiday(HolidayDetails),
    NotHoliday { is_holiday: bool },
}

impl HolidayPayload {
    pub fn is_holiday(&self) -> bool {
        matches!(self, Self::Holiday(_))
    }

    pub fn matches(&self) -> &[HolidayMatch] {
        match self {
            Self::Holiday(details) => &details.holidays,
            Self::NotHoliday { .. } => &[],
        }
    }
}

/// A resolved date and its payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    #[serde(serialize_with = "serialize_date")]
    pub date: NormalizedDate,
    pub payload: HolidayPayload,
}

fn serialize_date<S: Serializer>(date: &NormalizedDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(date)
}

/// All records of `dataset` whose interval contains `date`, in dataset order
pub fn match_date(dataset: &YearDataset, date: NaiveDate) -> Vec<HolidayMatch> {
    let parsed = dataset.parse_records();
    if parsed.skipped > 0 {
        debug!(
            year = dataset.year(),
            skipped = parsed.skipped,
            "Skipped malformed holiday entries while matching"
        );
    }
    parsed
        .records
        .iter()
        .filter(|record| record.contains(date))
        .map(HolidayMatch::from)
        .collect()
}

/// Build the payload for `date` from its matches
pub fn shape(date: &NormalizedDate, matches: Vec<HolidayMatch>) -> HolidayPayload {
    if matches.is_empty() {
        return HolidayPayload::NotHoliday { is_holiday: false };
    }

    let legacy = match matches.as_slice() {
        [single] => Some(LegacyFields {
            matched: single.clone(),
            deprecated_warning: DEPRECATION_NOTICE,
        }),
        _ => None,
    };

    HolidayPayload::Holiday(HolidayDetails {
        day: date.day_name(),
        week: date.week_number(),
        month: date.month_name(),
        is_holiday: true,
        count: matches.len(),
        holidays: matches,
        legacy,
    })
}

/// Resolves calendar dates against the yearly datasets
pub struct HolidayResolver {
    store: Arc<DataStore>,
    cache: Arc<CacheStore>,
}

impl HolidayResolver {
    pub fn new(store: Arc<DataStore>, cache: Arc<CacheStore>) -> Self {
        Self { store, cache }
    }

    /// Resolve `(year, month, day)`
    ///
    /// An impossible date fails before any cache or store access.
    pub async fn resolve(&self, year: i32, month: u32, day: u32) -> PoyaResult<Resolution> {
        let date = NormalizedDate::new(year, month, day).inspect_err(|_| {
            error!(
                "Invalid date provided: year={}, month={}, day={}",
                year, month, day
            )
        })?;

        let dataset = self.year_dataset(year).await?;
        let payload = shape(&date, match_date(&dataset, date.date()));
        Ok(Resolution { date, payload })
    }

    /// Cache-aside read of a year's dataset
    pub async fn year_dataset(&self, year: i32) -> PoyaResult<YearDataset> {
        if let Some(text) = self.cache.get(year).await {
            match YearDataset::from_json(year, &text) {
                Ok(dataset) => return Ok(dataset),
                Err(e) => error!(
                    "Failed to decode cached data for {}: {}",
                    self.cache.key_for(year),
                    e
                ),
            }
        }

        info!("No cache hit for year {}, reading from file", year);
        let dataset = self.store.load(year).await?;

        if self.cache.is_connected() {
            let text = dataset.to_json().map_err(PoyaError::from)?;
            self.cache.put(year, &text).await;
        }
        Ok(dataset)
    }
}
