//! Configuration validation

use std::time::Duration;

use http::HeaderValue;

use super::SessionConfig;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid buffer size: {0}")]
    InvalidBufferSize(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration conflict: {0}")]
    Conflict(String),
}

fn validate_timeout(timeout: Option<Duration>, name: &str) -> ConfigResult<()> {
    match timeout {
        Some(timeout) if timeout.is_zero() => Err(ConfigError::InvalidTimeout(format!(
            "{name} cannot be zero"
        ))),
        _ => Ok(()),
    }
}

impl SessionConfig {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` variant if any validation fails:
    /// - `InvalidTimeout` - if a configured timeout is zero
    /// - `InvalidBufferSize` - if `chunk_size` is zero
    /// - `InvalidParameter` - if the user agent or pool bound is unusable
    /// - `Conflict` - if the cache low-water mark exceeds the high-water mark
    pub fn validate(&self) -> ConfigResult<()> {
        validate_timeout(self.timeout, "timeout")?;
        validate_timeout(self.connect_timeout, "connect_timeout")?;

        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidBufferSize(
                "chunk_size cannot be zero".to_string(),
            ));
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::InvalidParameter(
                "user agent cannot be empty".to_string(),
            ));
        }
        if self.user_agent.len() > 1000 {
            return Err(ConfigError::InvalidParameter(
                "user agent must not exceed 1000 characters".to_string(),
            ));
        }
        if HeaderValue::from_str(&self.user_agent).is_err() {
            return Err(ConfigError::InvalidParameter(
                "user agent is not a valid header value".to_string(),
            ));
        }

        if self.max_idle_per_origin == Some(0) {
            return Err(ConfigError::InvalidParameter(
                "max_idle_per_origin must be greater than zero".to_string(),
            ));
        }

        if self.cache.enabled && self.cache.low_water > self.cache.high_water {
            return Err(ConfigError::Conflict(format!(
                "cache low_water ({}) exceeds high_water ({})",
                self.cache.low_water, self.cache.high_water
            )));
        }

        Ok(())
    }
}
