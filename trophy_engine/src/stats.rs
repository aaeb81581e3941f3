// SPDX-License-Identifier: MIT OR Apache-2.0
//! Trophy and statistics aggregation.
//!
//! Pure, read-only derivations over (catalog, records): trophy points
//! and levels, completion breakdowns, rarest and recent unlocks, and
//! calendar-day unlock streaks. Nothing here mutates state.

#![allow(clippy::cast_precision_loss)] // catalog sizes are small

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Category, Rarity, TrophyTier};
use crate::record::UserAchievementRecord;
use crate::rules::AchievementStatus;
use crate::ticker::AchievementSnapshot;

const MS_PER_DAY: i64 = 86_400_000;

/// Trophy point floor for each level, with its title.
///
/// Boundaries are inclusive on the lower bound: points in `[0, 99]`
/// map to level 1.
const TROPHY_LEVELS: [(u64, u32, &str); 10] = [
    (0, 1, "Bronze Novice"),
    (100, 2, "Bronze Veteran"),
    (300, 3, "Silver Novice"),
    (600, 4, "Silver Veteran"),
    (1_000, 5, "Gold Novice"),
    (2_000, 6, "Gold Veteran"),
    (4_000, 7, "Platinum Novice"),
    (8_000, 8, "Platinum Veteran"),
    (16_000, 9, "Platinum Master"),
    (32_000, 10, "Platinum Legend"),
];

/// A trophy level with its display title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrophyLevel {
    /// Level number, 1-10.
    pub level: u32,
    /// Display title.
    pub title: &'static str,
}

/// Maps total trophy points to a level via the step table.
#[must_use]
pub fn trophy_level(total_points: u64) -> TrophyLevel {
    for &(floor, level, title) in TROPHY_LEVELS.iter().rev() {
        if total_points >= floor {
            return TrophyLevel { level, title };
        }
    }
    TrophyLevel {
        level: 1,
        title: "Bronze Novice",
    }
}

/// Unlock streak over consecutive calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockStreak {
    /// Days in the streak that includes the most recent unlock; zero
    /// when that unlock is more than one day in the past.
    pub current_streak: u32,
    /// Longest run of consecutive unlock days ever.
    pub longest_streak: u32,
    /// Most recent unlock instant, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_unlock_ms: Option<i64>,
}

/// Completion summary for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryCompletion {
    /// Unlocked achievements in the category.
    pub unlocked: u32,
    /// Total achievements in the category.
    pub total: u32,
    /// Unlocked share, 0-100.
    pub percentage: f64,
}

/// Derived, non-persisted statistics for one user.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementStats {
    /// Unlocked achievement count.
    pub total_unlocked: u32,
    /// Catalog size.
    pub total_available: u32,
    /// Unlocked share of the catalog, 0-100.
    pub completion_percentage: f64,
    /// Unlocked counts per category; sums to `total_unlocked`.
    pub by_category: BTreeMap<Category, u32>,
    /// Unlocked counts per trophy tier; sums to `total_unlocked`.
    pub by_trophy_tier: BTreeMap<TrophyTier, u32>,
    /// Unlocked counts per rarity; sums to `total_unlocked`.
    pub by_rarity: BTreeMap<Rarity, u32>,
    /// XP over the unlocked set.
    pub total_xp: u64,
    /// Trophy points over the unlocked set.
    pub trophy_points: u64,
    /// Trophy level derived from `trophy_points`.
    pub trophy_level: TrophyLevel,
    /// Unlocked achievement with the highest rarity rank; ties broken
    /// by earliest unlock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarest_achievement: Option<AchievementSnapshot>,
    /// Most recent unlocks, newest first.
    pub recent_unlocks: Vec<AchievementSnapshot>,
    /// In-progress achievement closest to unlocking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_closest: Option<AchievementSnapshot>,
    /// Per-category completion breakdown.
    pub category_completion: BTreeMap<Category, CategoryCompletion>,
    /// Calendar-day unlock streaks.
    pub streak: UnlockStreak,
}

/// Computes the full statistics block for one user.
#[must_use]
pub fn compute(
    catalog: &Catalog,
    records: &std::collections::HashMap<String, UserAchievementRecord>,
    now_ms: i64,
    recent_limit: usize,
) -> AchievementStats {
    // Unlocked records paired with their definitions; records for ids
    // no longer in the catalog are skipped, the catalog is the source
    // of truth.
    let mut unlocked: Vec<(&UserAchievementRecord, &crate::catalog::AchievementDefinition)> =
        records
            .values()
            .filter(|r| r.is_unlocked())
            .filter_map(|r| catalog.get(&r.achievement_id).map(|d| (r, d)))
            .collect();
    unlocked.sort_by_key(|(r, _)| std::cmp::Reverse(r.unlocked_at_ms));

    let total_unlocked = unlocked.len() as u32;
    let total_available = catalog.len() as u32;
    let completion_percentage = if total_available > 0 {
        f64::from(total_unlocked) / f64::from(total_available) * 100.0
    } else {
        0.0
    };

    let mut by_category = BTreeMap::new();
    let mut by_trophy_tier = BTreeMap::new();
    let mut by_rarity = BTreeMap::new();
    let mut total_xp = 0_u64;
    let mut trophy_points = 0_u64;
    for (_, def) in &unlocked {
        *by_category.entry(def.category).or_insert(0_u32) += 1;
        *by_trophy_tier.entry(def.trophy_tier).or_insert(0_u32) += 1;
        *by_rarity.entry(def.rarity).or_insert(0_u32) += 1;
        total_xp = total_xp.saturating_add(def.xp_reward);
        trophy_points = trophy_points.saturating_add(def.trophy_tier.points());
    }

    let rarest_achievement = rarest(&unlocked);
    let recent_unlocks = unlocked
        .iter()
        .take(recent_limit)
        .map(|(_, def)| AchievementSnapshot::from(*def))
        .collect();

    let next_closest = records
        .values()
        .filter(|r| r.status == AchievementStatus::InProgress && r.max_progress > 0)
        .max_by(|a, b| {
            let fa = f64::from(a.progress) / f64::from(a.max_progress);
            let fb = f64::from(b.progress) / f64::from(b.max_progress);
            fa.total_cmp(&fb)
        })
        .and_then(|r| catalog.get(&r.achievement_id))
        .map(AchievementSnapshot::from);

    let mut category_completion = BTreeMap::new();
    for category in Category::ALL {
        let total = catalog.iter().filter(|d| d.category == category).count() as u32;
        let unlocked_count = by_category.get(&category).copied().unwrap_or(0);
        let percentage = if total > 0 {
            f64::from(unlocked_count) / f64::from(total) * 100.0
        } else {
            0.0
        };
        category_completion.insert(category, CategoryCompletion {
            unlocked: unlocked_count,
            total,
            percentage,
        });
    }

    let streak = streaks(
        unlocked.iter().filter_map(|(r, _)| r.unlocked_at_ms),
        now_ms,
    );

    AchievementStats {
        total_unlocked,
        total_available,
        completion_percentage,
        by_category,
        by_trophy_tier,
        by_rarity,
        total_xp,
        trophy_points,
        trophy_level: trophy_level(trophy_points),
        rarest_achievement,
        recent_unlocks,
        next_closest,
        category_completion,
        streak,
    }
}

/// Highest-rarity unlock; ties broken by earliest unlock instant.
fn rarest(
    unlocked: &[(&UserAchievementRecord, &crate::catalog::AchievementDefinition)],
) -> Option<AchievementSnapshot> {
    unlocked
        .iter()
        .min_by(|(ra, da), (rb, db)| {
            db.rarity
                .rank()
                .cmp(&da.rarity.rank())
                .then_with(|| ra.unlocked_at_ms.cmp(&rb.unlocked_at_ms))
        })
        .map(|(_, def)| AchievementSnapshot::from(*def))
}

/// Streaks over the calendar days containing at least one unlock.
fn streaks(unlock_instants: impl Iterator<Item = i64>, now_ms: i64) -> UnlockStreak {
    let mut days: Vec<i64> = Vec::new();
    let mut last_unlock_ms: Option<i64> = None;
    for instant in unlock_instants {
        days.push(instant.div_euclid(MS_PER_DAY));
        last_unlock_ms = Some(last_unlock_ms.map_or(instant, |prev: i64| prev.max(instant)));
    }
    if days.is_empty() {
        return UnlockStreak::default();
    }
    days.sort_unstable();
    days.dedup();

    let mut longest = 1_u32;
    let mut run = 1_u32;
    for pair in days.windows(2) {
        if pair[1] == pair[0] + 1 {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }

    // The trailing run is the current streak only while it is still
    // reachable from today.
    let today = now_ms.div_euclid(MS_PER_DAY);
    let last_day = *days.last().unwrap_or(&0);
    let current = if today - last_day <= 1 { run } else { 0 };

    UnlockStreak {
        current_streak: current,
        longest_streak: longest,
        last_unlock_ms,
    }
}
