// SPDX-License-Identifier: MIT OR Apache-2.0
//! Derived trophy statistics over real engine flows.

use integration_tests::{count_event, create_engine, time_event};
use trophy_engine::{Category, ProgressionEngine, Rarity, TelemetryEvent, TrophyTier};

const DAY: i64 = 86_400_000;

/// Unlocks bronze, gold, and platinum achievements on three
/// consecutive days.
fn engine_with_three_unlocks() -> ProgressionEngine {
    let engine = create_engine();
    engine
        .apply("sergio", &count_event("races_completed", 1), 10 * DAY)
        .expect("apply");
    engine
        .apply(
            "sergio",
            &TelemetryEvent::FirstPlace {
                condition: "events_won".to_string(),
            },
            11 * DAY,
        )
        .expect("apply");
    engine
        .apply("sergio", &time_event("rainbow_road_time", 85.0), 12 * DAY)
        .expect("apply");
    engine
}

#[test]
fn test_trophy_points_and_level() {
    let engine = engine_with_three_unlocks();
    let stats = engine.user_stats("sergio", 12 * DAY).expect("stats");

    assert_eq!(stats.total_unlocked, 3);
    assert_eq!(stats.total_available, 8);
    // Bronze 15 + gold 90 + platinum 300.
    assert_eq!(stats.trophy_points, 405);
    assert_eq!(stats.trophy_level.level, 3);
    assert_eq!(stats.trophy_level.title, "Silver Novice");
    assert_eq!(stats.total_xp, 1_800);
}

#[test]
fn test_breakdowns_sum_to_total() {
    let engine = engine_with_three_unlocks();
    let stats = engine.user_stats("sergio", 12 * DAY).expect("stats");

    assert_eq!(stats.by_category.values().sum::<u32>(), 3);
    assert_eq!(stats.by_trophy_tier.values().sum::<u32>(), 3);
    assert_eq!(stats.by_rarity.values().sum::<u32>(), 3);
    assert_eq!(stats.by_rarity[&Rarity::Legendary], 1);
    assert_eq!(stats.by_trophy_tier[&TrophyTier::Platinum], 1);
    assert_eq!(stats.by_category[&Category::GameSpecific], 2);
}

#[test]
fn test_rarest_and_recent_unlocks() {
    let engine = engine_with_three_unlocks();
    let stats = engine.user_stats("sergio", 12 * DAY).expect("stats");

    assert_eq!(
        stats.rarest_achievement.as_ref().map(|s| s.id.as_str()),
        Some("rainbow_road_master")
    );
    let recent: Vec<_> = stats.recent_unlocks.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(recent, vec!["rainbow_road_master", "event_winner", "first_race"]);
}

#[test]
fn test_next_closest_is_highest_fraction_in_progress() {
    let engine = engine_with_three_unlocks();
    let stats = engine.user_stats("sergio", 12 * DAY).expect("stats");

    // One race out of fifty is the only partial progress so far.
    assert_eq!(
        stats.next_closest.as_ref().map(|s| s.id.as_str()),
        Some("race_veteran")
    );
}

#[test]
fn test_streak_over_consecutive_unlock_days() {
    let engine = engine_with_three_unlocks();

    let stats = engine.user_stats("sergio", 12 * DAY).expect("stats");
    assert_eq!(stats.streak.current_streak, 3);
    assert_eq!(stats.streak.longest_streak, 3);
    assert_eq!(stats.streak.last_unlock_ms, Some(12 * DAY));

    // Two days later the current streak has lapsed.
    let later = engine.user_stats("sergio", 14 * DAY).expect("stats");
    assert_eq!(later.streak.current_streak, 0);
    assert_eq!(later.streak.longest_streak, 3);
}

#[test]
fn test_category_completion_breakdown() {
    let engine = engine_with_three_unlocks();
    let stats = engine.user_stats("sergio", 12 * DAY).expect("stats");

    let game = &stats.category_completion[&Category::GameSpecific];
    assert_eq!(game.total, 3);
    assert_eq!(game.unlocked, 2);

    let collection = &stats.category_completion[&Category::Collector];
    assert_eq!(collection.total, 1);
    assert_eq!(collection.unlocked, 0);
    assert_eq!(collection.percentage, 0.0);
}

#[test]
fn test_stats_for_fresh_user() {
    let engine = create_engine();
    let stats = engine.user_stats("nobody", 0).expect("stats");

    assert_eq!(stats.total_unlocked, 0);
    assert_eq!(stats.completion_percentage, 0.0);
    assert_eq!(stats.trophy_points, 0);
    assert_eq!(stats.trophy_level.level, 1);
    assert_eq!(stats.trophy_level.title, "Bronze Novice");
    assert!(stats.rarest_achievement.is_none());
    assert!(stats.recent_unlocks.is_empty());
    assert!(stats.next_closest.is_none());
}
