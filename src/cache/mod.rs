//! Cache-aside store for yearly datasets
//!
//! Holds the serialized dataset of a year under `<prefix>:<year>` for a
//! fixed lifetime (24h by default). Entries are advisory: a miss only
//! means the year must be read from the [`DataStore`](crate::store::DataStore).
//!
//! # Lifecycle
//!
//! | State | Reached when | Behavior |
//! |-------|--------------|----------|
//! | Connected | backend answered the startup ping | reads/writes go to the backend |
//! | Degraded | no backend configured, or ping failed | every `get` misses, every `put` is a no-op |
//!
//! The state is decided once in [`CacheStore::init`] and never changes.
//! Backend failures while connected are logged and absorbed.

pub mod backend;
pub mod memory;
pub mod redis_backend;

pub use backend::{CacheBackend, CacheError, CacheResult};
pub use memory::MemoryBackend;
pub use redis_backend::RedisBackend;

use crate::config::schema::{CacheBackendKind, CacheConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Whether the store has a live backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Connected,
    Degraded,
}

/// Dataset cache with graceful degradation
pub struct CacheStore {
    backend: Option<Arc<dyn CacheBackend>>,
    ttl: Duration,
    key_prefix: String,
}

impl CacheStore {
    /// Default entry lifetime
    pub const DEFAULT_TTL: Duration = Duration::from_secs(86_400);

    /// Ping `backend` once; keep it if it answers, otherwise degrade
    pub async fn init(backend: Arc<dyn CacheBackend>, ttl: Duration, key_prefix: &str) -> Self {
        match backend.ping().await {
            Ok(()) => {
                info!("{} cache connection established", backend.name());
                Self {
                    backend: Some(backend),
                    ttl,
                    key_prefix: key_prefix.to_string(),
                }
            }
            Err(e) => {
                error!(
                    "Failed to reach {} cache, falling back to file reads: {}",
                    backend.name(),
                    e
                );
                Self::degraded(key_prefix)
            }
        }
    }

    /// A store that always misses
    pub fn degraded(key_prefix: &str) -> Self {
        Self {
            backend: None,
            ttl: Self::DEFAULT_TTL,
            key_prefix: key_prefix.to_string(),
        }
    }

    /// Build the store described by the cache config
    pub async fn from_config(config: &CacheConfig) -> Self {
        let ttl = Duration::from_secs(config.ttl_secs);
        match config.backend {
            CacheBackendKind::None => {
                info!("Dataset cache disabled");
                Self::degraded(&config.key_prefix)
            }
            CacheBackendKind::Memory => {
                Self::init(Arc::new(MemoryBackend::new()), ttl, &config.key_prefix).await
            }
            CacheBackendKind::Redis => match config.url.as_deref() {
                None => {
                    info!("No Redis URL configured, dataset cache disabled");
                    Self::degraded(&config.key_prefix)
                }
                Some(url) => match RedisBackend::connect(url).await {
                    Ok(backend) => Self::init(Arc::new(backend), ttl, &config.key_prefix).await,
                    Err(e) => {
                        error!("Failed to connect to Redis, falling back to file reads: {}", e);
                        Self::degraded(&config.key_prefix)
                    }
                },
            },
        }
    }

    pub fn state(&self) -> CacheState {
        if self.backend.is_some() {
            CacheState::Connected
        } else {
            CacheState::Degraded
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state() == CacheState::Connected
    }

    /// The live backend, if connected
    pub fn backend(&self) -> Option<Arc<dyn CacheBackend>> {
        self.backend.clone()
    }

    /// Cache key of a year's dataset
    pub fn key_for(&self, year: i32) -> String {
        format!("{}:{}", self.key_prefix, year)
    }

    /// Cached dataset text for `year`; `None` on miss or backend failure
    pub async fn get(&self, year: i32) -> Option<String> {
        let backend = self.backend.as_ref()?;
        let key = self.key_for(year);
        match backend.get(&key).await {
            Ok(Some(value)) => {
                info!("Cache hit for {}", key);
                Some(value)
            }
            Ok(None) => {
                info!("Cache miss for {}", key);
                None
            }
            Err(e) => {
                error!("Cache read failed for {}, falling back to file read: {}", key, e);
                None
            }
        }
    }

    /// Store dataset text for `year`; failures are logged and dropped
    pub async fn put(&self, year: i32, value: &str) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        let key = self.key_for(year);
        match backend.set_ex(&key, value, self.ttl).await {
            Ok(()) => info!("Cached {} for {}s", key, self.ttl.as_secs()),
            Err(e) => error!("Failed to cache {}: {}", key, e),
        }
    }
}
