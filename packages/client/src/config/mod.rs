//! Session configuration
//!
//! `SessionConfig` carries every knob of the transport layer: socket
//! timeouts, redirect bound, retry delay list, cache water marks and pool
//! bounds. Construct it with `Default`, a preset, or struct update syntax,
//! then hand it to `Session::new`, which validates it.

pub mod cache;
pub mod validation;

use std::time::Duration;

pub use cache::CacheConfig;
pub use validation::{ConfigError, ConfigResult};

use crate::auth::Credentials;

/// Fixed `User-Agent` identifying the client and its version
pub const USER_AGENT: &str = concat!("sofa/", env!("CARGO_PKG_VERSION"));

/// Chunk size for streamed request bodies and the buffered/streamed threshold
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Default bound on a redirect chain
pub const MAX_REDIRECTS: u32 = 5;

/// Transport configuration for a `Session`
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Socket read/write timeout applied to every connection
    pub timeout: Option<Duration>,
    /// TCP connect timeout
    pub connect_timeout: Option<Duration>,
    /// Maximum number of redirects followed for one request
    pub max_redirects: u32,
    /// One entry per retry of a transient socket failure, slept before reconnecting
    pub retry_delays: Vec<Duration>,
    /// Response cache bounds
    pub cache: CacheConfig,
    /// Optional bound on idle connections kept per origin
    pub max_idle_per_origin: Option<usize>,
    pub user_agent: String,
    /// Responses with a content length below this are buffered, and
    /// streamed request bodies are sent in chunks of this size
    pub chunk_size: usize,
    pub tcp_nodelay: bool,
    pub tcp_keepalive: Option<Duration>,
    /// Credentials used to answer a 401 Basic challenge when the request
    /// itself carries none
    pub credentials: Option<Credentials>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            max_redirects: MAX_REDIRECTS,
            retry_delays: vec![Duration::ZERO],
            cache: CacheConfig::default(),
            max_idle_per_origin: None,
            user_agent: USER_AGENT.to_string(),
            chunk_size: CHUNK_SIZE,
            tcp_nodelay: true,
            tcp_keepalive: None,
            credentials: None,
        }
    }
}

impl SessionConfig {
    /// Configuration with the response cache disabled
    #[must_use]
    pub fn no_cache() -> Self {
        Self {
            cache: CacheConfig::disabled(),
            ..Self::default()
        }
    }

    /// Configuration that never retries a failed send
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            retry_delays: Vec::new(),
            ..Self::default()
        }
    }

    /// Configuration retrying `retries` times with exponentially growing delays
    ///
    /// The first retry is immediate, later ones wait `base`, `2 * base`,
    /// `4 * base`, ...
    #[must_use]
    pub fn with_backoff(retries: u32, base: Duration) -> Self {
        let retry_delays = (0..retries)
            .map(|attempt| match attempt {
                0 => Duration::ZERO,
                n => base.saturating_mul(1 << (n - 1).min(16)),
            })
            .collect();
        Self {
            retry_delays,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    #[must_use]
    pub fn retry_delays(mut self, delays: impl IntoIterator<Item = Duration>) -> Self {
        self.retry_delays = delays.into_iter().collect();
        self
    }

    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}
