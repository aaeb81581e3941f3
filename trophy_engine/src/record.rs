// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-(user, achievement) unlock records.
//!
//! Exactly one record exists per pair. Binary unlocks display as 1/1;
//! partial progress displays on a 100-point scale. Repeatable
//! achievements keep one record whose `repeat_count` grows with each
//! unlock cycle.

use serde::{Deserialize, Serialize};

use crate::rules::AchievementStatus;

/// One user's state for one achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAchievementRecord {
    /// Id of the achievement in the catalog.
    pub achievement_id: String,
    /// Current status.
    pub status: AchievementStatus,
    /// Display progress, `0..=max_progress`.
    pub progress: u32,
    /// Display scale: 1 for binary unlocks, 100 for partial progress.
    pub max_progress: u32,
    /// Unlock instant, epoch milliseconds; present iff unlocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at_ms: Option<i64>,
    /// Number of completed unlock cycles; meaningful only for
    /// repeatable achievements.
    #[serde(default)]
    pub repeat_count: u32,
}

impl UserAchievementRecord {
    /// Creates a locked record with no progress.
    #[must_use]
    pub fn locked(achievement_id: &str, max_progress: u32) -> Self {
        Self {
            achievement_id: achievement_id.to_string(),
            status: AchievementStatus::Locked,
            progress: 0,
            max_progress,
            unlocked_at_ms: None,
            repeat_count: 0,
        }
    }

    /// Creates an unlocked 1/1 record.
    #[must_use]
    pub fn unlocked(achievement_id: &str, now_ms: i64) -> Self {
        Self {
            achievement_id: achievement_id.to_string(),
            status: AchievementStatus::Unlocked,
            progress: 1,
            max_progress: 1,
            unlocked_at_ms: Some(now_ms),
            repeat_count: 1,
        }
    }

    /// Returns true if the record is unlocked.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.status == AchievementStatus::Unlocked
    }

    /// Marks the record unlocked at `now_ms`, incrementing the repeat
    /// count.
    pub fn mark_unlocked(&mut self, now_ms: i64) {
        self.status = AchievementStatus::Unlocked;
        self.progress = 1;
        self.max_progress = 1;
        self.unlocked_at_ms = Some(now_ms);
        self.repeat_count = self.repeat_count.saturating_add(1);
    }

    /// Records partial progress on the display scale, keeping the
    /// repeat count from any earlier unlock cycles.
    pub fn mark_partial(&mut self, status: AchievementStatus, progress: u32, max_progress: u32) {
        self.status = status;
        self.progress = progress.min(max_progress);
        self.max_progress = max_progress;
        self.unlocked_at_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_record() {
        let record = UserAchievementRecord::locked("rainbow_road_master", 100);
        assert_eq!(record.status, AchievementStatus::Locked);
        assert_eq!(record.progress, 0);
        assert_eq!(record.max_progress, 100);
        assert!(record.unlocked_at_ms.is_none());
        assert!(!record.is_unlocked());
    }

    #[test]
    fn test_unlocked_record() {
        let record = UserAchievementRecord::unlocked("rainbow_road_master", 1_700_000_000_000);
        assert!(record.is_unlocked());
        assert_eq!(record.progress, 1);
        assert_eq!(record.max_progress, 1);
        assert_eq!(record.unlocked_at_ms, Some(1_700_000_000_000));
        assert_eq!(record.repeat_count, 1);
    }

    #[test]
    fn test_mark_unlocked_increments_repeat_count() {
        let mut record = UserAchievementRecord::locked("event_marathon", 100);
        record.mark_unlocked(1_000);
        assert_eq!(record.repeat_count, 1);

        // Reset cycle, then unlock again.
        record.mark_partial(AchievementStatus::Locked, 0, 100);
        assert!(!record.is_unlocked());
        assert!(record.unlocked_at_ms.is_none());
        assert_eq!(record.repeat_count, 1);

        record.mark_unlocked(2_000);
        assert_eq!(record.repeat_count, 2);
        assert_eq!(record.unlocked_at_ms, Some(2_000));
    }

    #[test]
    fn test_mark_partial_caps_progress() {
        let mut record = UserAchievementRecord::locked("fanart_critic", 100);
        record.mark_partial(AchievementStatus::InProgress, 250, 100);
        assert_eq!(record.progress, 100);
    }

    #[test]
    fn test_record_serde_round_trip() {
        let record = UserAchievementRecord::unlocked("ntsc_speedrun_first", 42);
        let json = serde_json::to_string(&record).expect("serialize");
        assert!(json.contains("\"status\":\"unlocked\""));
        let back: UserAchievementRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, record);
    }
}
