//! API key validation
//!
//! A key is accepted if it appears in the primary key records (kept in the
//! cache backend, editable without a redeploy) or in the static fallback
//! set loaded from configuration at startup.

use crate::cache::{CacheBackend, CacheError};
use crate::error::{AuthFailure, PoyaError, PoyaResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// One primary key record; fields other than `key` are ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    pub key: Option<String>,
}

impl KeyRecord {
    /// A record whose `key` is missing or not a string never matches
    pub fn from_value(value: &Value) -> Self {
        Self {
            key: value.get("key").and_then(Value::as_str).map(str::to_string),
        }
    }
}

/// Source of the primary key records
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch_keys(&self) -> Result<Vec<KeyRecord>, CacheError>;
}

/// Key records stored as a JSON document in the cache backend
pub struct BackendKeySource {
    backend: Arc<dyn CacheBackend>,
    document: String,
    path: String,
}

impl BackendKeySource {
    pub fn new(backend: Arc<dyn CacheBackend>, document: &str, path: &str) -> Self {
        Self {
            backend,
            document: document.to_string(),
            path: path.to_string(),
        }
    }
}

#[async_trait]
impl KeySource for BackendKeySource {
    async fn fetch_keys(&self) -> Result<Vec<KeyRecord>, CacheError> {
        match self.backend.get_json(&self.document, &self.path).await? {
            Some(text) => {
                let records: Vec<Value> = serde_json::from_str(&text)?;
                Ok(records.iter().map(KeyRecord::from_value).collect())
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Where an accepted key was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    Primary,
    Fallback,
}

/// Validates caller API keys against the primary then fallback sets
pub struct AuthValidator {
    primary: Option<Arc<dyn KeySource>>,
    fallback: Vec<String>,
}

impl AuthValidator {
    /// `fallback` entries are expected to be trimmed and non-blank
    pub fn new(primary: Option<Arc<dyn KeySource>>, fallback: Vec<String>) -> Self {
        Self { primary, fallback }
    }

    /// Accept or reject `credential`
    pub async fn validate(&self, credential: Option<&str>) -> PoyaResult<String> {
        self.check(credential)
            .await
            .map(|(key, _)| key.to_string())
    }

    /// Like [`validate`](Self::validate), also reporting which set matched
    pub async fn check<'a>(&self, credential: Option<&'a str>) -> PoyaResult<(&'a str, KeyOrigin)> {
        let key = match credential.filter(|k| !k.is_empty()) {
            Some(key) => key,
            None => {
                warn!("API key is missing in the request");
                return Err(PoyaError::unauthorized(AuthFailure::Missing));
            }
        };

        if let Some(primary) = &self.primary {
            info!("Checking API key against primary key records");
            match primary.fetch_keys().await {
                Ok(records) => {
                    if records.iter().any(|r| r.key.as_deref() == Some(key)) {
                        info!("API key validated via primary key records");
                        return Ok((key, KeyOrigin::Primary));
                    }
                    warn!("API key not found in primary key records");
                }
                Err(e) => error!("Primary key lookup failed: {}", e),
            }
        }

        info!("Checking API key against fallback keys");
        if self.fallback.iter().all(|k| k.trim().is_empty()) {
            warn!("No fallback API keys configured");
            return Err(PoyaError::unauthorized(AuthFailure::NotConfigured));
        }
        if self.fallback.iter().any(|k| k == key) {
            info!("API key validated via fallback keys");
            return Ok((key, KeyOrigin::Fallback));
        }

        warn!("Rejecting request with invalid API key");
        Err(PoyaError::unauthorized(AuthFailure::Invalid))
    }
}
