// SPDX-License-Identifier: MIT OR Apache-2.0
//! Integration test helpers for the trophy engine.
//!
//! Provides a representative retro-gaming catalog and engine builders
//! shared by the scenario tests.

use std::sync::Arc;

use trophy_engine::{
    Catalog, CommunityFeed, EngineConfig, MemoryStore, ProgressionEngine, TelemetryEvent,
};

/// JSON catalog covering every rule type, a repeatable achievement,
/// and a limited-time window.
pub const CATALOG_JSON: &str = r#"{
  "achievements": [
    {
      "id": "first_race",
      "title": "Starting Line",
      "description": "Complete your first race",
      "icon": "checkered-flag",
      "category": "game-specific",
      "trophy_tier": "bronze",
      "rarity": "common",
      "xp_reward": 50,
      "rules": [{"type": "count_based", "condition": "races_completed", "value": 1}]
    },
    {
      "id": "race_veteran",
      "title": "Race Veteran",
      "description": "Complete 50 races",
      "icon": "flag",
      "category": "game-specific",
      "trophy_tier": "gold",
      "rarity": "rare",
      "xp_reward": 500,
      "rules": [{"type": "count_based", "condition": "races_completed", "value": 50}]
    },
    {
      "id": "rainbow_road_master",
      "title": "Rainbow Road Master",
      "description": "Finish Rainbow Road in under 90 seconds",
      "icon": "rainbow",
      "category": "game-specific",
      "trophy_tier": "platinum",
      "rarity": "legendary",
      "xp_reward": 1000,
      "rules": [
        {"type": "time_based", "condition": "rainbow_road_time", "time_limit_secs": 90.0}
      ]
    },
    {
      "id": "event_winner",
      "title": "Event Winner",
      "description": "Take first place in a community event",
      "icon": "trophy",
      "category": "community",
      "trophy_tier": "gold",
      "rarity": "epic",
      "xp_reward": 750,
      "rules": [{"type": "first_place", "condition": "events_won", "value": 1}]
    },
    {
      "id": "forum_regular",
      "title": "Forum Regular",
      "description": "Post 20 times on the community forum",
      "icon": "speech-bubble",
      "category": "community",
      "trophy_tier": "silver",
      "rarity": "uncommon",
      "xp_reward": 200,
      "rules": [
        {"type": "community_interaction", "condition": "forum_posts", "value": 20}
      ]
    },
    {
      "id": "cartridge_collector",
      "title": "Cartridge Collector",
      "description": "Register every N64 launch title",
      "icon": "cartridge",
      "category": "collector",
      "trophy_tier": "gold",
      "rarity": "rare",
      "xp_reward": 400,
      "rules": [
        {"type": "collection_complete", "condition": "n64_launch_titles", "value": 12}
      ]
    },
    {
      "id": "weekly_event_regular",
      "title": "Weekly Regular",
      "description": "Enter the weekly event twice",
      "icon": "calendar",
      "category": "community",
      "trophy_tier": "bronze",
      "rarity": "common",
      "xp_reward": 100,
      "repeatable": true,
      "rules": [{"type": "event_completion", "event_type": "weekly_event", "value": 2}]
    },
    {
      "id": "oktoberfest_champion",
      "title": "Oktoberfest Champion",
      "description": "Win the Oktoberfest tournament",
      "icon": "pretzel",
      "category": "limited",
      "trophy_tier": "platinum",
      "rarity": "legendary",
      "xp_reward": 1500,
      "limited": true,
      "window": {"start_ms": 1000000, "end_ms": 2000000},
      "rules": [{"type": "count_based", "condition": "oktoberfest_wins", "value": 1}]
    }
  ]
}"#;

/// Parses the shared catalog fixture.
///
/// # Panics
///
/// Panics if the fixture JSON is malformed.
#[must_use]
pub fn sample_catalog() -> Catalog {
    Catalog::from_json(CATALOG_JSON).expect("fixture catalog must parse")
}

/// Engine over the fixture catalog with an in-memory store.
#[must_use]
pub fn create_engine() -> ProgressionEngine {
    ProgressionEngine::new(sample_catalog(), Arc::new(MemoryStore::new()))
}

/// Engine plus a community feed wired as its ticker sink.
#[must_use]
pub fn create_engine_with_feed() -> (ProgressionEngine, Arc<CommunityFeed>) {
    let config = EngineConfig::default();
    let feed = Arc::new(CommunityFeed::new(config.feed_capacity));
    let engine = ProgressionEngine::new(sample_catalog(), Arc::new(MemoryStore::new()))
        .with_ticker(feed.clone())
        .with_config(config);
    (engine, feed)
}

/// Count-based telemetry event.
#[must_use]
pub fn count_event(condition: &str, delta: u64) -> TelemetryEvent {
    TelemetryEvent::CountBased {
        condition: condition.to_string(),
        delta,
    }
}

/// Time-based telemetry event.
#[must_use]
pub fn time_event(condition: &str, seconds: f64) -> TelemetryEvent {
    TelemetryEvent::TimeBased {
        condition: condition.to_string(),
        seconds,
    }
}
