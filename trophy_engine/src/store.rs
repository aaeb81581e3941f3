// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyed persistence interface for per-user progression state.
//!
//! The engine only ever reads and writes whole per-user rows through
//! this trait, under the per-user lock, so any durable backend that
//! can load and store a row transactionally can be substituted for
//! the in-memory default.

use std::collections::HashMap;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::record::UserAchievementRecord;
use crate::telemetry::Telemetry;

/// Everything the engine persists for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    /// Accumulated telemetry counters.
    #[serde(default)]
    pub telemetry: Telemetry,
    /// Records keyed by achievement id.
    #[serde(default)]
    pub records: HashMap<String, UserAchievementRecord>,
    /// Total XP awarded across all unlock cycles.
    #[serde(default)]
    pub xp_total: u64,
}

impl UserState {
    /// Creates empty state for a new user.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Awards XP, saturating at the maximum.
    pub fn award_xp(&mut self, amount: u64) -> u64 {
        self.xp_total = self.xp_total.saturating_add(amount);
        self.xp_total
    }
}

/// Persistence for per-user progression state, keyed by user id.
///
/// `load` distinguishes "no such user" (`Ok(None)`, a new user) from a
/// failed read (`Err`); the engine aborts evaluation on the latter
/// rather than risk treating an existing user as having zero
/// telemetry.
pub trait ProgressStore: Send + Sync {
    /// Loads a user's state, `None` if the user has none yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend read fails.
    fn load(&self, user_id: &str) -> Result<Option<UserState>, StoreError>;

    /// Stores a user's state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend write fails.
    fn save(&self, user_id: &str, state: &UserState) -> Result<(), StoreError>;
}

/// Volatile in-memory store, the reference backend.
///
/// Suitable for tests and demos; production deployments should wire a
/// durable implementation of [`ProgressStore`] instead.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<String, UserState>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with stored state.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self, user_id: &str) -> Result<Option<UserState>, StoreError> {
        Ok(self.users.get(user_id).map(|entry| entry.clone()))
    }

    fn save(&self, user_id: &str, state: &UserState) -> Result<(), StoreError> {
        self.users.insert(user_id.to_string(), state.clone());
        Ok(())
    }
}
