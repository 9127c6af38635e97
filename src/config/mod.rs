//! Configuration management for Poya

pub mod schema;

pub use schema::{CacheBackendKind, Config};

use crate::error::{PoyaError, PoyaResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("poya")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults if the file is absent
    pub async fn load(&self) -> PoyaResult<Config> {
        let config = if self.config_path.exists() {
            self.load_from_file(&self.config_path).await?
        } else {
            debug!("Config file not found, using defaults");
            Config::default()
        };
        Ok(config)
    }

    /// Load configuration, apply process environment overrides and validate
    pub async fn load_effective(&self) -> PoyaResult<Config> {
        let mut config = self.load().await?;
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());
        validate(&config, &self.config_path)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> PoyaResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| PoyaError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| PoyaError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> PoyaResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            PoyaError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> PoyaResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PoyaError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Overlay deployment environment variables onto a loaded config
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(keys) = lookup("API_KEYS") {
        debug!("Using fallback API keys from environment");
        config.auth.fallback_keys = keys;
    }
    if let Some(url) = lookup("REDIS_URL").filter(|u| !u.trim().is_empty()) {
        config.cache.url = Some(url);
    }
    if let Some(dir) = lookup("POYA_DATA_DIR") {
        config.data.dir = PathBuf::from(dir);
    }
    if let Some(bind) = lookup("POYA_BIND") {
        config.server.bind = bind;
    }
}

/// Reject configurations the service cannot run with
pub fn validate(config: &Config, path: &Path) -> PoyaResult<()> {
    let invalid = |reason: String| PoyaError::ConfigInvalid {
        path: path.to_path_buf(),
        reason,
    };

    if config.data.year_min > config.data.year_max {
        return Err(invalid(format!(
            "data.year_min ({}) is after data.year_max ({})",
            config.data.year_min, config.data.year_max
        )));
    }
    if config.server.api_key_header.trim().is_empty() {
        return Err(invalid("server.api_key_header must not be empty".to_string()));
    }
    if !matches!(config.general.log_format.as_str(), "text" | "json") {
        return Err(invalid(format!(
            "general.log_format must be \"text\" or \"json\", got \"{}\"",
            config.general.log_format
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8000");
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.data.year_max = 2027;

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.data.year_max, 2027);
    }

    #[tokio::test]
    async fn invalid_toml_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[data\nyear_min = ").unwrap();

        let err = ConfigManager::with_path(path.clone()).load().await.unwrap_err();
        match err {
            PoyaError::ConfigInvalid { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = [
            ("API_KEYS", "k1,k2"),
            ("REDIS_URL", "redis://cache:6379"),
            ("POYA_DATA_DIR", "/srv/json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.auth.fallback_key_set(), vec!["k1", "k2"]);
        assert_eq!(config.cache.url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.data.dir, PathBuf::from("/srv/json"));
        assert_eq!(config.server.bind, "127.0.0.1:8000");
    }

    #[test]
    fn blank_redis_url_is_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| (k == "REDIS_URL").then(|| "  ".to_string()));
        assert!(config.cache.url.is_none());
    }

    #[test]
    fn validate_rejects_inverted_years() {
        let mut config = Config::default();
        config.data.year_min = 2030;
        assert!(validate(&config, Path::new("c.toml")).is_err());
    }

    #[test]
    fn validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.general.log_format = "xml".to_string();
        assert!(validate(&config, Path::new("c.toml")).is_err());
        assert!(validate(&Config::default(), Path::new("c.toml")).is_ok());
    }
}
