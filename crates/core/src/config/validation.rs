//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::net::SocketAddr;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `bind_addr` is not a socket address
    /// - `jobtech_base_url` is not an http(s) URL
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `busy_timeout_ms` exceeds one minute
    /// - `user_agent` or `jobtech_api_key_header` is empty
    ///
    /// Returns `ConfigError::Missing` if `db_path` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing {
                field: "db_path".into(),
                hint: "Set JOBSWIPE_DB_PATH environment variable".into(),
            });
        }

        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Invalid {
                field: "bind_addr".into(),
                reason: format!("'{}' is not a socket address", self.bind_addr),
            });
        }

        match url::Url::parse(&self.jobtech_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigError::Invalid {
                    field: "jobtech_base_url".into(),
                    reason: "must be an absolute http(s) URL".into(),
                });
            }
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.busy_timeout_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "busy_timeout_ms".into(),
                reason: "must not exceed 1 minute (60000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.jobtech_api_key_header.is_empty() {
            return Err(ConfigError::Invalid {
                field: "jobtech_api_key_header".into(),
                reason: "must not be empty".into(),
            });
        }

        if !self.jobtech_api_key_header.bytes().all(is_header_token_byte) {
            return Err(ConfigError::Invalid {
                field: "jobtech_api_key_header".into(),
                reason: format!("'{}' is not a valid HTTP header name", self.jobtech_api_key_header),
            });
        }

        if self.cache_ttl_seconds == 0 {
            tracing::warn!("cache_ttl_seconds is 0; cached searches are only reused within the same millisecond");
        }

        Ok(())
    }
}

/// RFC 9110 token characters, the only ones allowed in a header name.
fn is_header_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
