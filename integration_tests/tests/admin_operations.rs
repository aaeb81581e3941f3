// SPDX-License-Identifier: MIT OR Apache-2.0
//! Administrative override and overview operations.

use integration_tests::{count_event, create_engine, create_engine_with_feed};
use trophy_engine::{AchievementStatus, EngineError};

#[test]
fn test_update_progress_rejects_unknown_id() {
    let engine = create_engine();
    let err = engine
        .update_progress("sergio", "no_such_achievement", 5, 10, 0)
        .expect_err("must fail");
    assert!(matches!(err, EngineError::UnknownAchievement(id) if id == "no_such_achievement"));
}

#[test]
fn test_update_progress_partial_then_unlock() {
    let engine = create_engine();

    let partial = engine
        .update_progress("sergio", "race_veteran", 30, 50, 1_000)
        .expect("update");
    assert_eq!(partial.status, AchievementStatus::InProgress);
    assert_eq!(partial.progress, 30);
    assert_eq!(partial.max_progress, 50);
    assert!(partial.unlocked_at_ms.is_none());

    let unlocked = engine
        .update_progress("sergio", "race_veteran", 50, 50, 2_000)
        .expect("update");
    assert!(unlocked.is_unlocked());
    assert_eq!(unlocked.unlocked_at_ms, Some(2_000));
}

#[test]
fn test_update_progress_awards_no_xp_and_never_broadcasts() {
    let (engine, feed) = create_engine_with_feed();

    engine
        .update_progress("sergio", "rainbow_road_master", 1, 1, 1_000)
        .expect("update");

    assert!(feed.is_empty());
    let overview = engine.overview("sergio").expect("overview");
    let record = overview
        .records
        .iter()
        .find(|r| r.achievement_id == "rainbow_road_master")
        .expect("record exists");
    assert!(record.is_unlocked());

    // Trophy stats still count the unlock, but the per-user XP total
    // in the store does not grow from an admin override.
    let stats = engine.user_stats("sergio", 1_000).expect("stats");
    assert_eq!(stats.total_unlocked, 1);
}

#[test]
fn test_forced_unlock_awards_xp_and_broadcasts() {
    let (engine, feed) = create_engine_with_feed();

    let record = engine
        .unlock_achievement("sergio", "rainbow_road_master", 9_000)
        .expect("unlock");
    assert!(record.is_unlocked());
    assert_eq!(record.unlocked_at_ms, Some(9_000));

    let events = feed.recent(10);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].achievement.id, "rainbow_road_master");
    assert!(events[0].is_rare);
}

#[test]
fn test_forced_unlock_is_idempotent() {
    let (engine, feed) = create_engine_with_feed();

    engine
        .unlock_achievement("sergio", "rainbow_road_master", 1_000)
        .expect("unlock");
    let repeat = engine
        .unlock_achievement("sergio", "rainbow_road_master", 2_000)
        .expect("unlock");

    assert_eq!(repeat.unlocked_at_ms, Some(1_000));
    assert_eq!(repeat.repeat_count, 1);
    assert_eq!(feed.len(), 1);
}

#[test]
fn test_forced_unlock_rejects_unknown_id() {
    let engine = create_engine();
    let err = engine
        .unlock_achievement("sergio", "no_such_achievement", 0)
        .expect_err("must fail");
    assert!(matches!(err, EngineError::UnknownAchievement(_)));
}

#[test]
fn test_overview_for_new_and_active_users() {
    let engine = create_engine();

    let fresh = engine.overview("nobody").expect("overview");
    assert_eq!(fresh.achievements.len(), engine.catalog().len());
    assert!(fresh.records.is_empty());
    assert!(fresh.telemetry.counts.is_empty());

    engine
        .apply("sergio", &count_event("races_completed", 25), 0)
        .expect("apply");
    let active = engine.overview("sergio").expect("overview");
    assert_eq!(active.telemetry.counts["races_completed"], 25);
    assert_eq!(active.records.len(), engine.catalog().len());
}
