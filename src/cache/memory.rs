//! In-process cache backend
//!
//! Used when `cache.backend = "memory"` and as the stand-in for Redis in
//! tests. Counts reads and writes, and can be switched unreachable.

use super::backend::{CacheBackend, CacheError, CacheResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Thread-safe in-memory backend
#[derive(Debug)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Entry>>,
    documents: RwLock<HashMap<String, Value>>,
    reachable: AtomicBool,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            documents: RwLock::new(HashMap::new()),
            reachable: AtomicBool::new(true),
            gets: AtomicUsize::new(0),
            sets: AtomicUsize::new(0),
        }
    }

    /// Store a JSON document (e.g. the API key records)
    pub async fn put_document(&self, key: &str, document: Value) {
        self.documents.write().await.insert(key.to_string(), document);
    }

    /// Simulate the engine going away or coming back
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Number of `get` calls served
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `set_ex` calls served
    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> CacheResult<()> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CacheError::Unavailable("memory backend switched off".to_string()))
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn ping(&self) -> CacheResult<()> {
        self.check_reachable()
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.check_reachable()?;
        self.gets.fetch_add(1, Ordering::SeqCst);
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.value.clone()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.check_reachable()?;
        self.sets.fetch_add(1, Ordering::SeqCst);
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > Instant::now());
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get_json(&self, key: &str, path: &str) -> CacheResult<Option<String>> {
        self.check_reachable()?;
        let documents = self.documents.read().await;
        let Some(document) = documents.get(key) else {
            return Ok(None);
        };

        // Legacy dotted path: "." is the root, ".a.b" walks object keys
        let mut current = document;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            match current.get(segment) {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(serde_json::to_string(current)?))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
