// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration for the progression engine.

use crate::catalog::Rarity;

/// Configuration for `ProgressionEngine` runtime behavior.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum rarity at which an unlock is broadcast to the ticker.
    pub broadcast_threshold: Rarity,
    /// Maximum entries in the recent-unlocks list of derived stats.
    pub recent_unlocks_limit: usize,
    /// Display scale for partial progress on records.
    pub progress_scale: u32,
    /// Capacity of the default in-memory community feed.
    pub feed_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            broadcast_threshold: Rarity::Epic,
            recent_unlocks_limit: 5,
            progress_scale: 100,
            feed_capacity: 64,
        }
    }
}

impl EngineConfig {
    /// Create a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rarity threshold for ticker broadcasts.
    #[must_use]
    pub const fn with_broadcast_threshold(mut self, rarity: Rarity) -> Self {
        self.broadcast_threshold = rarity;
        self
    }

    /// Set the recent-unlocks limit.
    #[must_use]
    pub const fn with_recent_unlocks_limit(mut self, limit: usize) -> Self {
        self.recent_unlocks_limit = limit;
        self
    }

    /// Set the community feed capacity.
    #[must_use]
    pub const fn with_feed_capacity(mut self, capacity: usize) -> Self {
        self.feed_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = EngineConfig::default();
        assert_eq!(config.broadcast_threshold, Rarity::Epic);
        assert_eq!(config.recent_unlocks_limit, 5);
        assert_eq!(config.progress_scale, 100);
        assert_eq!(config.feed_capacity, 64);
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::new()
            .with_broadcast_threshold(Rarity::Legendary)
            .with_recent_unlocks_limit(10)
            .with_feed_capacity(16);

        assert_eq!(config.broadcast_threshold, Rarity::Legendary);
        assert_eq!(config.recent_unlocks_limit, 10);
        assert_eq!(config.feed_capacity, 16);
    }
}
