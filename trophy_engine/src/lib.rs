// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rule-driven achievement and trophy progression engine.
//!
//! Gameplay and community telemetry flows in as [`TelemetryEvent`]s;
//! the engine merges each event into the user's accumulated
//! [`Telemetry`], re-evaluates every [`AchievementDefinition`] in the
//! [`Catalog`], upserts [`UserAchievementRecord`]s, awards XP, and
//! broadcasts noteworthy unlocks to a [`TickerSink`]. Derived trophy
//! statistics (points, levels, streaks, breakdowns) are computed on
//! demand and never persisted.
//!
//! ```
//! use std::sync::Arc;
//! use trophy_engine::{Catalog, MemoryStore, ProgressionEngine, TelemetryEvent};
//!
//! let catalog = Catalog::from_json(
//!     r#"{"achievements": [{
//!         "id": "race_veteran",
//!         "title": "Race Veteran",
//!         "description": "Complete 50 races",
//!         "icon": "flag",
//!         "category": "game-specific",
//!         "trophy_tier": "gold",
//!         "rarity": "rare",
//!         "xp_reward": 500,
//!         "rules": [{"type": "count_based", "condition": "races_completed", "value": 50}]
//!     }]}"#,
//! )
//! .unwrap();
//! let engine = ProgressionEngine::new(catalog, Arc::new(MemoryStore::new()));
//!
//! let outcome = engine
//!     .apply(
//!         "sergio",
//!         &TelemetryEvent::CountBased {
//!             condition: "races_completed".to_string(),
//!             delta: 1,
//!         },
//!         1_700_000_000_000,
//!     )
//!     .unwrap();
//! println!("unlocked {} achievements", outcome.newly_unlocked.len());
//! ```

// Pedantic lint configuration for trophy_engine
#![allow(clippy::missing_errors_doc)] // Error conditions are self-evident from Result types
#![allow(clippy::module_name_repetitions)] // Public names read better fully qualified
#![allow(clippy::uninlined_format_args)] // Keep format strings readable

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod record;
pub mod rules;
pub mod stats;
pub mod store;
pub mod telemetry;
pub mod ticker;

pub use catalog::{
    AchievementDefinition, Catalog, Category, Rarity, TimeWindow, TrophyTier, UnlockRewards,
    Visibility,
};
pub use config::EngineConfig;
pub use engine::{EvaluationOutcome, ProgressionEngine, UserOverview};
pub use error::{EngineError, Result, StoreError};
pub use record::UserAchievementRecord;
pub use rules::{resolve, AchievementStatus, Resolution, Rule};
pub use stats::{trophy_level, AchievementStats, CategoryCompletion, TrophyLevel, UnlockStreak};
pub use store::{MemoryStore, ProgressStore, UserState};
pub use telemetry::{EventProgress, Telemetry, TelemetryEvent};
pub use ticker::{
    AchievementSnapshot, CommunityFeed, CommunityUnlockEvent, NullSink, TickerSink,
};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as epoch milliseconds.
///
/// Convenience for hosts that do not carry their own clock; all engine
/// operations take the evaluation instant explicitly so tests and
/// replays can pin time.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
