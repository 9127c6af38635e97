//! Cache backend abstraction
//!
//! A backend is the engine behind [`CacheStore`](super::CacheStore): a
//! key/value store with expiry that can also hold JSON documents (the
//! primary API key records live there).

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result type for backend operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Backend failures
///
/// These never cross the `CacheStore` boundary; key lookups in `auth`
/// treat them as "no match".
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid cached document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Key/value engine behind the dataset cache
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Round-trip check used once at startup
    async fn ping(&self) -> CacheResult<()>;

    /// Fetch a string value
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store a string value that expires after `ttl`
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Fetch the JSON text found at `path` inside document `key`
    async fn get_json(&self, key: &str, path: &str) -> CacheResult<Option<String>>;

    /// Engine name for logs and status output
    fn name(&self) -> &'static str;
}
