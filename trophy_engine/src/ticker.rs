// SPDX-License-Identifier: MIT OR Apache-2.0
//! Community broadcast of noteworthy unlocks.
//!
//! Unlocks whose rarity crosses the configured threshold are handed to
//! a [`TickerSink`] for the community ticker feed. Delivery is
//! push-only and fire-and-forget: a sink may drop events, but it can
//! never roll back an unlock.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{AchievementDefinition, Rarity, TrophyTier};

/// Snapshot of an achievement embedded in a broadcast event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementSnapshot {
    /// Achievement id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Display icon.
    pub icon: String,
    /// Trophy tier.
    pub trophy_tier: TrophyTier,
    /// Rarity label.
    pub rarity: Rarity,
    /// XP reward.
    pub xp_reward: u64,
}

impl From<&AchievementDefinition> for AchievementSnapshot {
    fn from(def: &AchievementDefinition) -> Self {
        Self {
            id: def.id.clone(),
            title: def.title.clone(),
            icon: def.icon.clone(),
            trophy_tier: def.trophy_tier,
            rarity: def.rarity,
            xp_reward: def.xp_reward,
        }
    }
}

/// One unlock broadcast to the community ticker.
///
/// Ephemeral: produced once per qualifying unlock and owned by the
/// consumer; no replay guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityUnlockEvent {
    /// Id of the unlocking user.
    pub user_id: String,
    /// Display name; the engine knows users by id, so this matches
    /// `user_id` unless the host enriches it.
    pub username: String,
    /// Achievement snapshot.
    pub achievement: AchievementSnapshot,
    /// Unlock instant, epoch milliseconds.
    pub timestamp_ms: i64,
    /// Whether the unlock crossed the noteworthy-rarity threshold.
    pub is_rare: bool,
}

/// Consumer of community unlock events.
///
/// Implementations must not block the caller for long; the engine
/// publishes while holding the per-user lock.
pub trait TickerSink: Send + Sync {
    /// Accepts one event. Fire-and-forget; failures stay in the sink.
    fn publish(&self, event: CommunityUnlockEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl TickerSink for NullSink {
    fn publish(&self, _event: CommunityUnlockEvent) {}
}

/// Bounded in-memory feed backing the community ticker UI.
///
/// Holds the newest `capacity` events; older entries are dropped first.
#[derive(Debug)]
pub struct CommunityFeed {
    capacity: usize,
    entries: Mutex<VecDeque<CommunityUnlockEvent>>,
}

impl CommunityFeed {
    /// Creates a feed holding at most `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
        }
    }

    /// Newest-first copy of the feed contents.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<CommunityUnlockEvent> {
        let entries = self.entries.lock();
        entries.iter().rev().take(limit).cloned().collect()
    }

    /// Number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if no events are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl TickerSink for CommunityFeed {
    fn publish(&self, event: CommunityUnlockEvent) {
        let mut entries = self.entries.lock();
        while entries.len() >= self.capacity {
            if let Some(dropped) = entries.pop_front() {
                debug!(
                    user = %dropped.user_id,
                    achievement = %dropped.achievement.id,
                    "community feed full, dropping oldest event"
                );
            }
        }
        entries.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(user: &str, id: &str, timestamp_ms: i64) -> CommunityUnlockEvent {
        CommunityUnlockEvent {
            user_id: user.to_string(),
            username: user.to_string(),
            achievement: AchievementSnapshot {
                id: id.to_string(),
                title: "NTSC Speedrun Pioneer".to_string(),
                icon: String::new(),
                trophy_tier: TrophyTier::Platinum,
                rarity: Rarity::Legendary,
                xp_reward: 1_000,
            },
            timestamp_ms,
            is_rare: true,
        }
    }

    #[test]
    fn test_feed_orders_newest_first() {
        let feed = CommunityFeed::new(8);
        feed.publish(event("sergio", "a", 1));
        feed.publish(event("mario_fan", "b", 2));
        feed.publish(event("retro_gamer", "c", 3));

        let recent = feed.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].achievement.id, "c");
        assert_eq!(recent[1].achievement.id, "b");
    }

    #[test]
    fn test_feed_drops_oldest_at_capacity() {
        let feed = CommunityFeed::new(2);
        feed.publish(event("u", "a", 1));
        feed.publish(event("u", "b", 2));
        feed.publish(event("u", "c", 3));

        assert_eq!(feed.len(), 2);
        let ids: Vec<_> = feed.recent(10).iter().map(|e| e.achievement.id.clone()).collect();
        assert_eq!(ids, vec!["c".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_null_sink_discards() {
        let sink = NullSink;
        sink.publish(event("u", "a", 1));
    }

    #[test]
    fn test_snapshot_from_definition() {
        use crate::catalog::{Category, Visibility};
        let def = AchievementDefinition {
            id: "ntsc_speedrun_first".to_string(),
            title: "NTSC Speedrun Pioneer".to_string(),
            description: "First NTSC speedrun in the community".to_string(),
            icon: "lightning".to_string(),
            category: Category::Platform,
            trophy_tier: TrophyTier::Platinum,
            rarity: Rarity::Legendary,
            xp_reward: 1_000,
            rules: Vec::new(),
            repeatable: false,
            limited: false,
            window: None,
            visibility: Visibility::Public,
            rewards: None,
        };
        let snapshot = AchievementSnapshot::from(&def);
        assert_eq!(snapshot.id, "ntsc_speedrun_first");
        assert_eq!(snapshot.rarity, Rarity::Legendary);
        assert_eq!(snapshot.xp_reward, 1_000);
    }

    #[test]
    fn test_event_serde_round_trip() {
        let event = event("sergio", "ntsc_speedrun_first", 1_700_000_000_000);
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"is_rare\":true"));
        let back: CommunityUnlockEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }
}
