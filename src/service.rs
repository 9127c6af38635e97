//! Service wiring
//!
//! Builds the data store, cache, resolver, listing filter and key
//! validator from configuration, and gates every query on the supported
//! year range and parameter bounds before any I/O happens.

use crate::auth::{AuthValidator, BackendKeySource, KeySource};
use crate::cache::{CacheState, CacheStore};
use crate::config::Config;
use crate::error::{PoyaError, PoyaResult};
use crate::listing::{HolidayListing, ListFilter};
use crate::resolver::{HolidayResolver, Resolution};
use crate::store::DataStore;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Version reported by the status endpoints
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Closed range of years with published data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    pub fn check(&self, year: i32) -> PoyaResult<()> {
        if self.contains(year) {
            Ok(())
        } else {
            Err(PoyaError::YearOutOfRange {
                year,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Whether a year has a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Coverage {
    #[serde(rename = "ok")]
    Available,
    #[serde(rename = "not available")]
    NotAvailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub year: i32,
    pub coverage: Coverage,
}

/// Service health summary
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub api_version: &'static str,
    /// Set only by callers that ran the key gate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_validation: Option<&'static str>,
    pub timestamp: String,
    pub cache_backend: Option<&'static str>,
    pub cache_connected: bool,
    pub data_store_year_min: i32,
    pub data_store_year_max: i32,
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub data_store_year_min: i32,
    pub data_store_year_max: i32,
}

/// Everything a request needs, shared across requests
pub struct HolidayService {
    store: Arc<DataStore>,
    cache: Arc<CacheStore>,
    resolver: HolidayResolver,
    listing: ListFilter,
    auth: AuthValidator,
    years: YearRange,
}

impl HolidayService {
    pub fn new(
        store: Arc<DataStore>,
        cache: Arc<CacheStore>,
        auth: AuthValidator,
        years: YearRange,
    ) -> Self {
        Self {
            resolver: HolidayResolver::new(store.clone(), cache.clone()),
            listing: ListFilter::new(store.clone()),
            store,
            cache,
            auth,
            years,
        }
    }

    /// Connect the cache once and wire the components
    ///
    /// The cache backend doubles as the primary key source, but only when
    /// it answered at startup.
    pub async fn from_config(config: &Config) -> Self {
        let store = Arc::new(DataStore::new(config.data.dir.clone()));
        let cache = Arc::new(CacheStore::from_config(&config.cache).await);

        let primary = cache.backend().map(|backend| {
            Arc::new(BackendKeySource::new(
                backend,
                &config.auth.primary_document,
                &config.auth.primary_path,
            )) as Arc<dyn KeySource>
        });
        let fallback = config.auth.fallback_key_set();
        info!(
            "Key sources: primary {}, {} fallback key(s)",
            if primary.is_some() { "enabled" } else { "disabled" },
            fallback.len()
        );

        let years = YearRange::new(config.data.year_min, config.data.year_max);
        Self::new(store, cache, AuthValidator::new(primary, fallback), years)
    }

    pub fn auth(&self) -> &AuthValidator {
        &self.auth
    }

    pub fn years(&self) -> YearRange {
        self.years
    }

    pub fn cache_state(&self) -> CacheState {
        self.cache.state()
    }

    /// Resolve a date
    pub async fn info(&self, year: i32, month: u32, day: u32) -> PoyaResult<Resolution> {
        self.years.check(year)?;
        check_bounds("month", month, 1, 12)?;
        check_bounds("day", day, 1, 31)?;
        self.resolver.resolve(year, month, day).await
    }

    /// Resolve a date, keeping only whether it is a holiday
    pub async fn check(&self, year: i32, month: u32, day: u32) -> PoyaResult<(String, bool)> {
        let resolution = self.info(year, month, day).await?;
        Ok((resolution.date.to_string(), resolution.payload.is_holiday()))
    }

    /// List a year's holidays
    pub async fn list(
        &self,
        year: i32,
        month: Option<u32>,
        category: Option<&str>,
        format: &str,
    ) -> PoyaResult<HolidayListing> {
        self.years.check(year)?;
        if let Some(month) = month {
            check_bounds("month", month, 1, 12)?;
        }
        self.listing.list(year, month, category, format).await
    }

    /// Whether `year` has a dataset file
    pub async fn coverage(&self, year: i32) -> PoyaResult<CoverageReport> {
        self.years.check(year)?;
        let coverage = if self.store.has_year(year).await? {
            Coverage::Available
        } else {
            Coverage::NotAvailable
        };
        Ok(CoverageReport { year, coverage })
    }

    pub fn status(&self) -> ServiceStatus {
        let backend = self.cache.backend();
        ServiceStatus {
            status: "ok",
            api_version: API_VERSION,
            api_key_validation: None,
            timestamp: Utc::now().to_rfc3339(),
            cache_backend: backend.as_ref().map(|b| b.name()),
            cache_connected: backend.is_some(),
            data_store_year_min: self.years.min,
            data_store_year_max: self.years.max,
            message: "It seems like API is up and running smoothly!",
        }
    }

    pub fn version(&self) -> VersionInfo {
        VersionInfo {
            version: API_VERSION,
            data_store_year_min: self.years.min,
            data_store_year_max: self.years.max,
        }
    }
}

fn check_bounds(name: &'static str, value: u32, min: u32, max: u32) -> PoyaResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(PoyaError::InvalidParameter {
            name,
            value: format!("{} (expected {}-{})", value, min, max),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheBackendKind;
    use tempfile::TempDir;

    const DATASET: &str = r#"[
        {"uid": "newyear", "summary": "Sinhala and Tamil New Year", "categories": ["Public"], "start": "2024-04-13", "end": "2024-04-14"}
    ]"#;

    async fn service() -> (HolidayService, TempDir) {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("2024.json"), DATASET).unwrap();

        let mut config = Config::default();
        config.data.dir = temp.path().to_path_buf();
        config.cache.backend = CacheBackendKind::Memory;
        config.auth.fallback_keys = "local-key".to_string();
        (HolidayService::from_config(&config).await, temp)
    }

    #[tokio::test]
    async fn wires_memory_cache_and_fallback_keys() {
        let (service, _temp) = service().await;
        assert_eq!(service.cache_state(), CacheState::Connected);
        assert_eq!(
            service.auth().validate(Some("local-key")).await.unwrap(),
            "local-key"
        );
    }

    #[tokio::test]
    async fn check_reports_boolean() {
        let (service, _temp) = service().await;
        assert_eq!(
            service.check(2024, 4, 13).await.unwrap(),
            ("2024-04-13".to_string(), true)
        );
        assert!(!service.check(2024, 4, 14).await.unwrap().1);
    }

    #[tokio::test]
    async fn year_outside_range_rejected() {
        let (service, _temp) = service().await;
        assert!(matches!(
            service.info(2020, 1, 1).await,
            Err(PoyaError::YearOutOfRange { year: 2020, .. })
        ));
        assert!(matches!(
            service.list(2027, None, None, "full").await,
            Err(PoyaError::YearOutOfRange { .. })
        ));
        assert!(service.coverage(1999).await.is_err());
    }

    #[tokio::test]
    async fn parameter_bounds_rejected() {
        let (service, _temp) = service().await;
        assert!(matches!(
            service.info(2024, 13, 1).await,
            Err(PoyaError::InvalidParameter { name: "month", .. })
        ));
        assert!(matches!(
            service.info(2024, 1, 0).await,
            Err(PoyaError::InvalidParameter { name: "day", .. })
        ));
        assert!(matches!(
            service.list(2024, Some(0), None, "full").await,
            Err(PoyaError::InvalidParameter { .. })
        ));
    }

    #[tokio::test]
    async fn coverage_reports_availability() {
        let (service, _temp) = service().await;
        assert_eq!(
            service.coverage(2024).await.unwrap().coverage,
            Coverage::Available
        );
        let missing = service.coverage(2025).await.unwrap();
        assert_eq!(
            serde_json::to_value(&missing).unwrap(),
            serde_json::json!({"year": 2025, "coverage": "not available"})
        );
    }

    #[tokio::test]
    async fn status_reflects_cache() {
        let (service, _temp) = service().await;
        let status = service.status();
        assert!(status.cache_connected);
        assert_eq!(status.cache_backend, Some("memory"));
        assert_eq!(status.data_store_year_min, 2021);
        assert_eq!(service.version().version, API_VERSION);

        let value = serde_json::to_value(&status).unwrap();
        assert!(value.get("api_key_validation").is_none());
    }

    #[test]
    fn year_range_is_closed() {
        let range = YearRange::new(2021, 2026);
        assert!(range.contains(2021));
        assert!(range.contains(2026));
        assert!(!range.contains(2027));
    }
}
