//! Configuration management for cbmx

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Base URL used when nothing is configured in development mode
pub const DEV_FALLBACK_API_URL: &str = "http://127.0.0.1:5181";

/// Runtime mode, controls how a missing API URL is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RunMode {
    /// Fall back to the local API when no URL is configured
    #[default]
    Development,
    /// Refuse to run without an explicit API URL
    Production,
}

/// Where the resolved API URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    /// `--api-url` flag or `CBMX_API_URL`
    Override,
    /// `api_url` in the config file
    ConfigFile,
    /// Development fallback
    Fallback,
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the product explorer API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Lifetime of cached responses, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Delay applied to watched search input, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Months of history requested by sales/stock history pages
    #[serde(default = "default_history_months")]
    pub history_months: u32,

    /// Client-side request budget per second
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_second: u32,

    /// Request timeout, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// CSV field separator
    #[serde(default = "default_csv_separator")]
    pub csv_separator: char,
}

fn default_cache_ttl_secs() -> u64 {
    5 * 60
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_history_months() -> u32 {
    12
}

fn default_rate_limit() -> u32 {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_csv_separator() -> char {
    ';'
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            debounce_ms: default_debounce_ms(),
            history_months: default_history_months(),
            rate_limit_per_second: default_rate_limit(),
            timeout_secs: default_timeout_secs(),
            csv_separator: default_csv_separator(),
        }
    }
}

impl Preferences {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".cbmx").join("config.yaml"))
    }

    /// Resolve an optional override into a concrete config path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Load configuration from an optional override path.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Load configuration, using defaults when no file exists yet.
    ///
    /// The API needs no credentials, so a missing file is not an error for
    /// read commands.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match Self::load_at(path) {
            Ok(config) => Ok(config),
            Err(crate::error::Error::Config(ConfigError::NotFound)) => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Save configuration to an optional override path.
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Resolve the API base URL.
    ///
    /// Precedence: override (flag or env) > config file > development
    /// fallback. Production mode never falls back.
    pub fn resolve_api_url(
        &self,
        override_url: Option<&str>,
        mode: RunMode,
    ) -> Result<(String, UrlSource)> {
        if let Some(url) = override_url.filter(|u| !u.trim().is_empty()) {
            return Ok((normalize_url(url)?, UrlSource::Override));
        }

        if let Some(url) = self.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok((normalize_url(url)?, UrlSource::ConfigFile));
        }

        match mode {
            RunMode::Development => {
                log::warn!(
                    "API URL not configured, falling back to {}",
                    DEV_FALLBACK_API_URL
                );
                Ok((DEV_FALLBACK_API_URL.to_string(), UrlSource::Fallback))
            }
            RunMode::Production => Err(ConfigError::MissingApiUrl.into()),
        }
    }
}

fn normalize_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid(format!("API URL must be http(s): {}", url)).into());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_url.is_none());
        assert_eq!(config.preferences.cache_ttl_secs, 300);
        assert_eq!(config.preferences.history_months, 12);
        assert_eq!(config.preferences.csv_separator, ';');
    }

    #[test]
    fn test_override_wins() {
        let config = Config {
            api_url: Some("http://from-file:9000".to_string()),
            ..Default::default()
        };

        let (url, source) = config
            .resolve_api_url(Some("https://api.example.com/"), RunMode::Production)
            .unwrap();
        assert_eq!(url, "https://api.example.com");
        assert_eq!(source, UrlSource::Override);
    }

    #[test]
    fn test_config_file_used_without_override() {
        let config = Config {
            api_url: Some("http://from-file:9000".to_string()),
            ..Default::default()
        };

        let (url, source) = config.resolve_api_url(None, RunMode::Production).unwrap();
        assert_eq!(url, "http://from-file:9000");
        assert_eq!(source, UrlSource::ConfigFile);
    }

    #[test]
    fn test_development_fallback() {
        let (url, source) = Config::default()
            .resolve_api_url(None, RunMode::Development)
            .unwrap();
        assert_eq!(url, DEV_FALLBACK_API_URL);
        assert_eq!(source, UrlSource::Fallback);
    }

    #[test]
    fn test_production_requires_url() {
        let err = Config::default()
            .resolve_api_url(Some("  "), RunMode::Production)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Config(ConfigError::MissingApiUrl)
        ));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = Config::default()
            .resolve_api_url(Some("ftp://nope"), RunMode::Development)
            .unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn test_save_and_load_roundtrip_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let path_str = path.to_string_lossy().to_string();

        let mut config = Config::default();
        config.api_url = Some("http://localhost:5181".to_string());
        config.preferences.debounce_ms = 150;
        config.save_at(Some(&path_str)).unwrap();

        let loaded = Config::load_at(Some(&path_str)).unwrap();
        assert_eq!(loaded.api_url.as_deref(), Some("http://localhost:5181"));
        assert_eq!(loaded.preferences.debounce_ms, 150);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.yaml");
        let config = Config::load_or_default(Some(&path.to_string_lossy())).unwrap();
        assert!(config.api_url.is_none());
    }
}
