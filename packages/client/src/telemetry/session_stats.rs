//! Lock-free session counters
//!
//! Every counter is a cache-padded atomic so that threads sharing a session
//! do not contend on one cache line. Counters are updated with relaxed
//! ordering; a snapshot is a best-effort point-in-time view.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

#[derive(Debug, Default)]
pub struct SessionStats {
    /// Logical requests started through `Session::request`
    pub requests: CachePadded<AtomicU64>,
    /// Sockets opened, including reconnects
    pub connections_opened: CachePadded<AtomicU64>,
    /// Sends repeated after a transient socket failure
    pub retries: CachePadded<AtomicU64>,
    pub redirects: CachePadded<AtomicU64>,
    /// 304 responses answered from the cache
    pub cache_hits: CachePadded<AtomicU64>,
    pub cache_stores: CachePadded<AtomicU64>,
    pub cache_evictions: CachePadded<AtomicU64>,
}

/// Plain copy of the counters at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStatsSnapshot {
    pub requests: u64,
    pub connections_opened: u64,
    pub retries: u64,
    pub redirects: u64,
    pub cache_hits: u64,
    pub cache_stores: u64,
    pub cache_evictions: u64,
}

impl SessionStats {
    #[inline]
    pub(crate) fn incr(counter: &CachePadded<AtomicU64>) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add(counter: &CachePadded<AtomicU64>, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn snapshot(&self) -> SessionStatsSnapshot {
        SessionStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            redirects: self.redirects.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_stores: self.cache_stores.load(Ordering::Relaxed),
            cache_evictions: self.cache_evictions.load(Ordering::Relaxed),
        }
    }
}
