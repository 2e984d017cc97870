//! Cache operations for lookup, store and invalidation

use super::core::ResponseCache;
use crate::cache::cache_entry::CacheEntry;

impl ResponseCache {
    /// Get the cached response for a URL
    pub fn lookup(&self, url: &str) -> Option<CacheEntry> {
        if !self.config.enabled {
            return None;
        }
        self.lock().get(url).cloned()
    }

    /// Insert or overwrite the entry for a URL
    ///
    /// Returns `false` when caching is disabled and nothing was stored.
    pub fn store(&self, url: impl Into<String>, entry: CacheEntry) -> bool {
        if !self.config.enabled {
            return false;
        }
        let url = url.into();
        tracing::trace!(target: "sofa_client::cache", url = %url, status = %entry.status, "storing response");
        self.lock().insert(url, entry);
        true
    }

    /// Invalidate the entry for a URL
    ///
    /// Removing an absent key is a no-op.
    pub fn remove(&self, url: &str) -> Option<CacheEntry> {
        let removed = self.lock().remove(url);
        if removed.is_some() {
            tracing::trace!(target: "sofa_client::cache", url = %url, "invalidated cached response");
        }
        removed
    }
}
