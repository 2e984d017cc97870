//! Core ResponseCache structure and initialization

use std::sync::{Mutex, MutexGuard, PoisonError};

use hashbrown::HashMap;

use crate::cache::cache_entry::CacheEntry;
use crate::config::CacheConfig;

/// URL-keyed HTTP response cache
///
/// The lock is held only for the duration of a single map operation, never
/// across network I/O.
#[derive(Debug)]
pub struct ResponseCache {
    pub(super) entries: Mutex<HashMap<String, CacheEntry>>,
    pub(super) config: CacheConfig,
}

impl ResponseCache {
    /// Create new response cache with configuration
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
