// SPDX-License-Identifier: MIT OR Apache-2.0
//! The progression engine: one telemetry event in, unlock decisions out.
//!
//! Every operation serializes per user: a keyed mutex guarantees at
//! most one evaluation in flight per user id, wrapping store access as
//! well as the computation, while different users proceed fully in
//! parallel. The catalog is immutable and needs no locking.

#![allow(clippy::cast_possible_truncation)] // progress scale fits u32
#![allow(clippy::cast_sign_loss)] // progress fractions are non-negative

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use crate::catalog::{AchievementDefinition, Catalog};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::record::UserAchievementRecord;
use crate::rules::{resolve, AchievementStatus};
use crate::stats::{self, AchievementStats};
use crate::store::{ProgressStore, UserState};
use crate::telemetry::{Telemetry, TelemetryEvent};
use crate::ticker::{AchievementSnapshot, CommunityUnlockEvent, NullSink, TickerSink};

/// Result of applying one telemetry event for one user.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationOutcome {
    /// Achievements that transitioned to unlocked in this evaluation.
    pub newly_unlocked: Vec<AchievementDefinition>,
    /// The user's full record set after the evaluation, catalog order.
    pub records: Vec<UserAchievementRecord>,
    /// XP awarded by this evaluation.
    pub xp_awarded: u64,
}

/// Catalog, records, and raw telemetry for one user.
#[derive(Debug, Clone, Serialize)]
pub struct UserOverview {
    /// All valid achievement definitions.
    pub achievements: Vec<AchievementDefinition>,
    /// The user's records, catalog order.
    pub records: Vec<UserAchievementRecord>,
    /// The user's raw telemetry.
    pub telemetry: Telemetry,
}

/// Rule-driven achievement progression engine.
///
/// Holds the immutable catalog, the keyed persistence store, and the
/// community ticker sink. All methods take `&self` and are safe to
/// call from many sessions concurrently.
pub struct ProgressionEngine {
    catalog: Arc<Catalog>,
    store: Arc<dyn ProgressStore>,
    ticker: Arc<dyn TickerSink>,
    locks: DashMap<String, Arc<Mutex<()>>>,
    config: EngineConfig,
}

impl ProgressionEngine {
    /// Creates an engine with a discarding ticker sink and default
    /// configuration.
    #[must_use]
    pub fn new(catalog: Catalog, store: Arc<dyn ProgressStore>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store,
            ticker: Arc::new(NullSink),
            locks: DashMap::new(),
            config: EngineConfig::default(),
        }
    }

    /// Sets the community ticker sink.
    #[must_use]
    pub fn with_ticker(mut self, ticker: Arc<dyn TickerSink>) -> Self {
        self.ticker = ticker;
        self
    }

    /// Sets the engine configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Applies one telemetry event for one user and re-evaluates the
    /// catalog (the `check_achievements` operation).
    ///
    /// Merges the event into the user's telemetry, resolves the status
    /// of every achievement, upserts records, awards XP for new
    /// unlocks, persists, and then broadcasts noteworthy unlocks.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the backend read or write
    /// fails; a failed read aborts before any evaluation so a user is
    /// never treated as having zero telemetry.
    pub fn apply(
        &self,
        user_id: &str,
        event: &TelemetryEvent,
        now_ms: i64,
    ) -> Result<EvaluationOutcome> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock();

        let mut state = self.load_state(user_id)?;
        state.telemetry.merge(event);

        let (newly_unlocked, xp_awarded) = self.evaluate(&mut state, now_ms);
        self.store.save(user_id, &state)?;
        self.broadcast(user_id, &newly_unlocked, now_ms);

        Ok(EvaluationOutcome {
            records: self.ordered_records(&state),
            newly_unlocked,
            xp_awarded,
        })
    }

    /// Returns catalog, records, and raw telemetry for one user.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the backend read fails.
    pub fn overview(&self, user_id: &str) -> Result<UserOverview> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock();

        let state = self.load_state(user_id)?;
        Ok(UserOverview {
            achievements: self.catalog.definitions().to_vec(),
            records: self.ordered_records(&state),
            telemetry: state.telemetry,
        })
    }

    /// Administrative progress override, bypassing rule evaluation.
    ///
    /// Intended for manual grants; crossing `max_progress` unlocks the
    /// record but awards no XP and broadcasts nothing.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAchievement`] when the id is not
    /// in the catalog, or [`EngineError::Store`] on backend failure.
    pub fn update_progress(
        &self,
        user_id: &str,
        achievement_id: &str,
        progress: u32,
        max_progress: u32,
        now_ms: i64,
    ) -> Result<UserAchievementRecord> {
        if !self.catalog.contains(achievement_id) {
            return Err(EngineError::UnknownAchievement(achievement_id.to_string()));
        }

        let lock = self.user_lock(user_id);
        let _guard = lock.lock();

        let mut state = self.load_state(user_id)?;
        let record = state
            .records
            .entry(achievement_id.to_string())
            .or_insert_with(|| UserAchievementRecord::locked(achievement_id, max_progress));

        let capped = progress.min(max_progress);
        if capped >= max_progress && max_progress > 0 {
            if !record.is_unlocked() {
                record.repeat_count = record.repeat_count.saturating_add(1);
                record.unlocked_at_ms = Some(now_ms);
            }
            record.status = AchievementStatus::Unlocked;
            record.progress = capped;
            record.max_progress = max_progress;
        } else {
            let status = if capped > 0 {
                AchievementStatus::InProgress
            } else {
                AchievementStatus::Locked
            };
            record.mark_partial(status, capped, max_progress);
        }

        let updated = record.clone();
        self.store.save(user_id, &state)?;
        Ok(updated)
    }

    /// Administrative forced unlock.
    ///
    /// Treated as a real unlock: awards XP and broadcasts when the
    /// rarity qualifies. Idempotent for non-repeatable achievements
    /// that are already unlocked.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAchievement`] when the id is not
    /// in the catalog, or [`EngineError::Store`] on backend failure.
    pub fn unlock_achievement(
        &self,
        user_id: &str,
        achievement_id: &str,
        now_ms: i64,
    ) -> Result<UserAchievementRecord> {
        let definition = self
            .catalog
            .get(achievement_id)
            .ok_or_else(|| EngineError::UnknownAchievement(achievement_id.to_string()))?
            .clone();

        let lock = self.user_lock(user_id);
        let _guard = lock.lock();

        let mut state = self.load_state(user_id)?;
        let record = state
            .records
            .entry(achievement_id.to_string())
            .or_insert_with(|| UserAchievementRecord::locked(achievement_id, 1));

        if record.is_unlocked() && !definition.repeatable {
            return Ok(record.clone());
        }

        record.mark_unlocked(now_ms);
        let updated = record.clone();
        state.award_xp(definition.xp_reward);
        debug!(user = %user_id, achievement = %achievement_id, "forced unlock");

        self.store.save(user_id, &state)?;
        self.broadcast(user_id, std::slice::from_ref(&definition), now_ms);
        Ok(updated)
    }

    /// Derives the full statistics block for one user.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the backend read fails.
    pub fn user_stats(&self, user_id: &str, now_ms: i64) -> Result<AchievementStats> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock();

        let state = self.load_state(user_id)?;
        Ok(stats::compute(
            &self.catalog,
            &state.records,
            now_ms,
            self.config.recent_unlocks_limit,
        ))
    }

    /// Re-evaluates every catalog entry against the user's telemetry.
    ///
    /// Returns the definitions newly unlocked by this pass and the XP
    /// awarded for them.
    fn evaluate(&self, state: &mut UserState, now_ms: i64) -> (Vec<AchievementDefinition>, u64) {
        let mut newly_unlocked = Vec::new();
        let mut xp_awarded = 0_u64;
        let scale = self.config.progress_scale;

        for definition in self.catalog.iter() {
            let was_unlocked = state
                .records
                .get(&definition.id)
                .is_some_and(UserAchievementRecord::is_unlocked);

            if was_unlocked {
                if !definition.repeatable {
                    // Terminal: never re-fire unlock side effects.
                    continue;
                }
                if definition.check_unlock(&state.telemetry) {
                    // Still satisfied; a repeat cycle starts only after
                    // an external telemetry reset drops the rules back
                    // below their thresholds.
                    continue;
                }
            }

            let resolution = resolve(definition, &state.telemetry, now_ms);
            let record = state
                .records
                .entry(definition.id.clone())
                .or_insert_with(|| UserAchievementRecord::locked(&definition.id, scale));

            if resolution.status == AchievementStatus::Unlocked {
                record.mark_unlocked(now_ms);
                xp_awarded = xp_awarded.saturating_add(definition.xp_reward);
                debug!(
                    achievement = %definition.id,
                    repeat = record.repeat_count,
                    "achievement unlocked"
                );
                newly_unlocked.push(definition.clone());
            } else {
                let scaled = (resolution.fraction * f64::from(scale)).floor() as u32;
                record.mark_partial(resolution.status, scaled, scale);
            }
        }

        state.award_xp(xp_awarded);
        (newly_unlocked, xp_awarded)
    }

    /// Publishes qualifying unlocks to the ticker sink.
    ///
    /// Runs after the state is persisted; sink behavior can never roll
    /// back an unlock.
    fn broadcast(&self, user_id: &str, unlocked: &[AchievementDefinition], now_ms: i64) {
        for definition in unlocked {
            if definition.rarity < self.config.broadcast_threshold {
                continue;
            }
            self.ticker.publish(CommunityUnlockEvent {
                user_id: user_id.to_string(),
                username: user_id.to_string(),
                achievement: AchievementSnapshot::from(definition),
                timestamp_ms: now_ms,
                is_rare: true,
            });
        }
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn load_state(&self, user_id: &str) -> Result<UserState> {
        Ok(self.store.load(user_id)?.unwrap_or_default())
    }

    fn ordered_records(&self, state: &UserState) -> Vec<UserAchievementRecord> {
        self.catalog
            .iter()
            .filter_map(|definition| state.records.get(&definition.id))
            .cloned()
            .collect()
    }
}
