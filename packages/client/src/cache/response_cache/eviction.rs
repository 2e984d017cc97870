//! Cache eviction by response date

use std::time::SystemTime;

use super::core::ResponseCache;

impl ResponseCache {
    /// Cut the cache down to its low-water mark once it exceeds the high-water mark
    ///
    /// The `low_water` entries with the most recent `Date` survive.
    /// Returns the number of entries evicted.
    pub fn evict_oldest_if_over_capacity(&self) -> usize {
        let mut entries = self.lock();
        if entries.len() <= self.config.high_water {
            return 0;
        }

        let mut dated: Vec<(SystemTime, String)> = entries
            .iter()
            .map(|(url, entry)| (entry.date, url.clone()))
            .collect();

        // Newest first
        dated.sort_by(|a, b| b.0.cmp(&a.0));

        let evicted = dated.len().saturating_sub(self.config.low_water);
        for (_, url) in dated.into_iter().skip(self.config.low_water) {
            entries.remove(&url);
        }

        tracing::debug!(
            target: "sofa_client::cache",
            evicted,
            remaining = entries.len(),
            high_water = self.config.high_water,
            "cache evicted oldest entries"
        );

        evicted
    }
}
