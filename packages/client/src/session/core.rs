//! Session construction and shared state

use std::fmt;
use std::sync::Arc;

use http::HeaderValue;

use crate::cache::ResponseCache;
use crate::config::SessionConfig;
use crate::connect::{ConnectionPool, Connector};
use crate::error::{self, Result};
use crate::redirect::PermanentRedirectTable;
use crate::telemetry::{SessionStats, SessionStatsSnapshot};

pub(super) struct SessionInner {
    pub(super) config: SessionConfig,
    pub(super) user_agent: HeaderValue,
    pub(super) pool: Arc<ConnectionPool>,
    pub(super) cache: ResponseCache,
    pub(super) redirects: PermanentRedirectTable,
    pub(super) connector: Connector,
    pub(super) stats: SessionStats,
}

/// Shared HTTP session
///
/// Cloning is cheap; clones share the pool, cache, redirect table and
/// statistics. A session may be used from many threads at once.
#[derive(Clone)]
pub struct Session {
    pub(super) inner: Arc<SessionInner>,
}

impl Session {
    /// Create a session after validating `config`
    ///
    /// # Errors
    ///
    /// Returns a builder error if the configuration is invalid.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate().map_err(error::configuration)?;
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(error::configuration)?;

        tracing::debug!(
            target: "sofa_client::session",
            max_redirects = config.max_redirects,
            retries = config.retry_delays.len(),
            cache = config.cache.enabled,
            "Created session"
        );

        Ok(Self::from_parts(config, user_agent))
    }

    fn from_parts(config: SessionConfig, user_agent: HeaderValue) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                pool: Arc::new(ConnectionPool::new(config.max_idle_per_origin)),
                cache: ResponseCache::new(config.cache.clone()),
                redirects: PermanentRedirectTable::new(),
                connector: Connector::new(&config),
                stats: SessionStats::default(),
                user_agent,
                config,
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.inner.cache
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.inner.pool
    }

    pub fn permanent_redirects(&self) -> &PermanentRedirectTable {
        &self.inner.redirects
    }

    pub fn stats(&self) -> SessionStatsSnapshot {
        self.inner.stats.snapshot()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from_parts(
            SessionConfig::default(),
            HeaderValue::from_static(crate::config::USER_AGENT),
        )
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("idle_connections", &self.inner.pool.total_idle())
            .field("cached_responses", &self.inner.cache.len())
            .field("max_redirects", &self.inner.config.max_redirects)
            .finish()
    }
}
