//! Configuration schema for Poya
//!
//! Configuration is stored at `~/.config/poya/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Dataset location and supported years
    pub data: DataConfig,

    /// Dataset cache settings
    pub cache: CacheConfig,

    /// API key settings
    pub auth: AuthConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,

    /// Request header carrying the API key
    pub api_key_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            api_key_header: "X-API-Key".to_string(),
        }
    }
}

/// Dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding `<year>.json` files
    pub dir: PathBuf,

    /// First supported year (inclusive)
    pub year_min: i32,

    /// Last supported year (inclusive)
    pub year_max: i32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("json"),
            year_min: 2021,
            year_max: 2026,
        }
    }
}

/// Which engine backs the dataset cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    #[default]
    Redis,
    Memory,
    None,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Backend engine
    pub backend: CacheBackendKind,

    /// Connection URL (redis backend only)
    pub url: Option<String>,

    /// Entry lifetime in seconds
    pub ttl_secs: u64,

    /// Prefix for per-year keys
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Redis,
            url: None,
            ttl_secs: 86_400,
            key_prefix: "holidays".to_string(),
        }
    }
}

/// API key configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Comma-delimited fallback keys
    pub fallback_keys: String,

    /// Cache backend document holding the primary key records
    pub primary_document: String,

    /// Path of the record array inside the primary document
    pub primary_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            fallback_keys: String::new(),
            primary_document: "API_KEYS".to_string(),
            primary_path: ".api_keys".to_string(),
        }
    }
}

impl AuthConfig {
    /// Split the fallback list, dropping blank entries
    pub fn fallback_key_set(&self) -> Vec<String> {
        self.fallback_keys
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect()
    }
}
