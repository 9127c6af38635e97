//! Year listings with optional month and category filters
//!
//! Reads go straight to the data store; listings are not cache-routed.

use crate::error::{PoyaError, PoyaResult};
use crate::holiday::HolidayRecord;
use crate::store::DataStore;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Listing projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFormat {
    /// Start dates only, one per distinct date
    Simple,
    /// One structured entry per holiday
    #[default]
    Full,
}

impl FromStr for ListFormat {
    type Err = PoyaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "full" => Ok(Self::Full),
            other => Err(PoyaError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ListFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// One holiday in a full listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub date: NaiveDate,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub categories: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub id: Option<String>,
}

impl From<&HolidayRecord> for ListEntry {
    fn from(record: &HolidayRecord) -> Self {
        Self {
            date: record.start,
            name: record.name.clone(),
            categories: record.categories.clone(),
            start: record.start,
            end: record.end,
            id: record.id.clone(),
        }
    }
}

/// Listing result, serialized as a bare array
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HolidayListing {
    Simple(Vec<NaiveDate>),
    Full(Vec<ListEntry>),
}

impl HolidayListing {
    pub fn len(&self) -> usize {
        match self {
            Self::Simple(dates) => dates.len(),
            Self::Full(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Filters and projects a year's holidays
pub struct ListFilter {
    store: Arc<DataStore>,
}

impl ListFilter {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }

    /// List a year's holidays
    ///
    /// `format` is checked before the dataset is read.
    pub async fn list(
        &self,
        year: i32,
        month: Option<u32>,
        category: Option<&str>,
        format: &str,
    ) -> PoyaResult<HolidayListing> {
        let format: ListFormat = format.parse()?;
        let dataset = self.store.load(year).await?;
        let parsed = dataset.parse_records();
        if parsed.skipped > 0 {
            debug!(
                year,
                skipped = parsed.skipped,
                "Skipped malformed holiday entries while listing"
            );
        }

        let selected = parsed.records.iter().filter(|record| {
            month.map_or(true, |m| record.start.month() == m)
                && category.map_or(true, |c| record.has_category(c))
        });

        let listing = match format {
            ListFormat::Simple => {
                let mut seen = HashSet::new();
                HolidayListing::Simple(
                    selected
                        .map(|record| record.start)
                        .filter(|start| seen.insert(*start))
                        .collect(),
                )
            }
            ListFormat::Full => HolidayListing::Full(selected.map(ListEntry::from).collect()),
        };
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const DATASET: &str = r#"[
        {"uid": "thai-pongal", "summary": "Tamil Thai Pongal Day", "categories": ["Public", "Bank", "Mercantile"], "start": "2024-01-15", "end": "2024-01-16"},
        {"uid": "duruthu", "summary": "Duruthu Full Moon Poya Day", "categories": ["Public", "Bank", "Poya"], "start": "2024-01-25", "end": "2024-01-26"},
        {"uid": "newyear", "summary": "Sinhala and Tamil New Year", "categories": ["Public", "Bank"], "start": "2024-04-13", "end": "2024-04-14"},
        {"uid": "newyear-bank", "summary": "New Year Bank Holiday", "categories": ["Bank"], "start": "2024-04-13", "end": "2024-04-14"},
        {"uid": "no-end", "summary": "Missing end", "categories": ["Public"], "start": "2024-04-20"},
        {"uid": "bad-date", "summary": "Bad date", "categories": ["Public"], "start": "2024-04-31", "end": "2024-05-01"},
        {"uid": "vesak", "summary": "Vesak Full Moon Poya Day", "categories": ["Public", "Bank", "Poya"], "start": "2024-05-23", "end": "2024-05-24"}
    ]"#;

    fn filter_with(dataset: &str) -> (ListFilter, Arc<DataStore>, TempDir) {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("2024.json"), dataset).unwrap();
        let store = Arc::new(DataStore::new(temp.path()));
        (ListFilter::new(store.clone()), store, temp)
    }

    #[tokio::test]
    async fn full_listing_skips_malformed_records() {
        let (filter, _store, _temp) = filter_with(DATASET);
        let listing = filter.list(2024, None, None, "full").await.unwrap();
        assert_eq!(listing.len(), 5);

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(
            value[0],
            json!({
                "date": "2024-01-15",
                "name": "Tamil Thai Pongal Day",
                "type": ["Public", "Bank", "Mercantile"],
                "start": "2024-01-15",
                "end": "2024-01-16",
                "id": "thai-pongal"
            })
        );
    }

    #[tokio::test]
    async fn simple_listing_deduplicates_start_dates() {
        let (filter, _store, _temp) = filter_with(DATASET);
        let listing = filter.list(2024, Some(4), None, "simple").await.unwrap();
        assert_eq!(serde_json::to_value(&listing).unwrap(), json!(["2024-04-13"]));
    }

    #[tokio::test]
    async fn simple_listing_keeps_dataset_order() {
        let (filter, _store, _temp) = filter_with(DATASET);
        let listing = filter.list(2024, None, None, "simple").await.unwrap();
        assert_eq!(
            serde_json::to_value(&listing).unwrap(),
            json!(["2024-01-15", "2024-01-25", "2024-04-13", "2024-05-23"])
        );
    }

    #[tokio::test]
    async fn category_filter_ignores_case() {
        let (filter, _store, _temp) = filter_with(DATASET);
        let listing = filter.list(2024, None, Some("public"), "full").await.unwrap();
        let ids: Vec<_> = match listing {
            HolidayListing::Full(entries) => entries.into_iter().filter_map(|e| e.id).collect(),
            HolidayListing::Simple(_) => panic!("expected full listing"),
        };
        assert_eq!(ids, vec!["thai-pongal", "duruthu", "newyear", "vesak"]);
    }

    #[tokio::test]
    async fn month_and_category_combine() {
        let (filter, _store, _temp) = filter_with(DATASET);
        let listing = filter.list(2024, Some(1), Some("POYA"), "full").await.unwrap();
        assert_eq!(listing.len(), 1);
        assert!(filter.list(2024, Some(2), None, "full").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_format_rejected_before_io() {
        let (filter, store, _temp) = filter_with(DATASET);
        assert!(matches!(
            filter.list(2024, None, None, "xml").await,
            Err(PoyaError::InvalidFormat(_))
        ));
        assert_eq!(store.reads(), 0);
    }

    #[tokio::test]
    async fn missing_and_corrupt_years() {
        let (filter, _store, _temp) = filter_with("[1, 2");
        assert!(matches!(
            filter.list(2024, None, None, "full").await,
            Err(PoyaError::DatasetCorrupt { .. })
        ));
        assert!(matches!(
            filter.list(2022, None, None, "full").await,
            Err(PoyaError::YearNotFound(2022))
        ));
    }

    #[test]
    fn format_parses() {
        assert_eq!("simple".parse::<ListFormat>().unwrap(), ListFormat::Simple);
        assert_eq!("full".parse::<ListFormat>().unwrap(), ListFormat::Full);
        assert!("Full".parse::<ListFormat>().is_err());
        assert_eq!(ListFormat::default().to_string(), "full");
    }
}
