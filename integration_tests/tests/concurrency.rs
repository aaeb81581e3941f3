// SPDX-License-Identifier: MIT OR Apache-2.0
//! Concurrent evaluation across threads.
//!
//! Same-user sessions must serialize; distinct users must not
//! interfere with each other.

use std::sync::Arc;
use std::thread;

use integration_tests::{count_event, create_engine};

#[test]
fn test_same_user_concurrent_events_lose_nothing() {
    let engine = Arc::new(create_engine());

    let mut handles = Vec::new();
    for _ in 0..10 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for _ in 0..5 {
                engine
                    .apply("sergio", &count_event("races_completed", 1), 0)
                    .expect("apply");
            }
        }));
    }
    for handle in handles {
        handle.join().expect("thread panicked");
    }

    let overview = engine.overview("sergio").expect("overview");
    assert_eq!(overview.telemetry.counts["races_completed"], 50);

    // Both race achievements fire exactly once across all sessions.
    let stats = engine.user_stats("sergio", 0).expect("stats");
    assert_eq!(stats.total_unlocked, 2);
    assert_eq!(stats.total_xp, 550);
}

#[test]
fn test_distinct_users_progress_in_parallel() {
    let engine = Arc::new(create_engine());

    let mut handles = Vec::new();
    for user in ["sergio", "mario_fan", "retro_gamer", "n64_kid"] {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for _ in 0..25 {
                engine
                    .apply(user, &count_event("races_completed", 1), 0)
                    .expect("apply");
            }
        }));
    }
    for handle in handles {
        handle.join().expect("thread panicked");
    }

    for user in ["sergio", "mario_fan", "retro_gamer", "n64_kid"] {
        let overview = engine.overview(user).expect("overview");
        assert_eq!(overview.telemetry.counts["races_completed"], 25);
        let stats = engine.user_stats(user, 0).expect("stats");
        assert_eq!(stats.total_unlocked, 1);
    }
}
