//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (JOBSWIPE_*)
//! 2. TOML config file (if JOBSWIPE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (JOBSWIPE_*)
/// 2. TOML config file (if JOBSWIPE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite database holding jobs, swipes and cached searches.
    ///
    /// Set via JOBSWIPE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Socket address the HTTP server listens on.
    ///
    /// Set via JOBSWIPE_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the JobTech JobSearch API.
    ///
    /// Set via JOBSWIPE_JOBTECH_BASE_URL environment variable.
    #[serde(default = "default_jobtech_base_url")]
    pub jobtech_base_url: String,

    /// Optional API key for the JobSearch API.
    ///
    /// Set via JOBSWIPE_JOBTECH_API_KEY environment variable.
    #[serde(default)]
    pub jobtech_api_key: Option<String>,

    /// Header name the API key is sent in.
    ///
    /// Set via JOBSWIPE_JOBTECH_API_KEY_HEADER environment variable.
    #[serde(default = "default_api_key_header")]
    pub jobtech_api_key_header: String,

    /// User-Agent string for upstream requests.
    ///
    /// Set via JOBSWIPE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upstream request timeout in milliseconds.
    ///
    /// Set via JOBSWIPE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum age of a cached search before it is refetched.
    ///
    /// Set via JOBSWIPE_CACHE_TTL_SECONDS environment variable.
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,

    /// How long a write waits on a locked database file.
    ///
    /// Set via JOBSWIPE_BUSY_TIMEOUT_MS environment variable.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/job-cache.sqlite")
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".into()
}

fn default_jobtech_base_url() -> String {
    "https://jobsearch.api.jobtechdev.se".into()
}

fn default_api_key_header() -> String {
    "X-API-Key".into()
}

fn default_user_agent() -> String {
    "jobswipe/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_cache_ttl_seconds() -> u64 {
    300
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            bind_addr: default_bind_addr(),
            jobtech_base_url: default_jobtech_base_url(),
            jobtech_api_key: None,
            jobtech_api_key_header: default_api_key_header(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Search cache time-to-live, evaluated when a cached entry is read.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// SQLite busy timeout.
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `JOBSWIPE_`
    /// 2. TOML file from `JOBSWIPE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("JOBSWIPE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("JOBSWIPE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// API key header pair, if an API key is configured.
    pub fn jobtech_api_key_pair(&self) -> Option<(&str, &str)> {
        self.jobtech_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| (self.jobtech_api_key_header.as_str(), key))
    }
}
