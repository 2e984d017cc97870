//! Response cache bounds

/// Cache configuration and limits
///
/// Eviction is batched: once the entry count exceeds `high_water`, the
/// cache is cut down to the `low_water` most recently dated entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Entries kept after an eviction pass
    pub low_water: usize,
    /// Entry count that triggers an eviction pass
    pub high_water: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            low_water: 10,
            high_water: 75,
        }
    }
}

impl CacheConfig {
    /// Create no-cache configuration (disabled caching)
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bounded(low_water: usize, high_water: usize) -> Self {
        Self {
            enabled: true,
            low_water,
            high_water,
        }
    }
}
