// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-user telemetry: the namespaced counters that rules read.
//!
//! Counter namespaces (`events`, `counts`, `first_place`, `community`,
//! `collections`) are non-decreasing within a user's lifetime; `times`
//! holds the last observation only, not a personal best.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Completion counter for one event type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventProgress {
    /// Number of completed runs of this event type.
    pub completed: u64,
}

/// Accumulated per-user counters and observations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Completion counts keyed by event type.
    #[serde(default)]
    pub events: HashMap<String, EventProgress>,
    /// Last-observed times in seconds, keyed by condition.
    #[serde(default)]
    pub times: HashMap<String, f64>,
    /// Monotonic counters keyed by condition.
    #[serde(default)]
    pub counts: HashMap<String, u64>,
    /// First-place finishes keyed by condition. Serialized as
    /// `achievements` for compatibility with stored user rows.
    #[serde(default, rename = "achievements")]
    pub first_place: HashMap<String, u64>,
    /// Community interaction counters keyed by condition.
    #[serde(default)]
    pub community: HashMap<String, u64>,
    /// Collection progress counters keyed by condition.
    #[serde(default)]
    pub collections: HashMap<String, u64>,
}

impl Telemetry {
    /// Creates empty telemetry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one event into the counters.
    ///
    /// Counter namespaces saturate instead of wrapping; a time
    /// observation overwrites the previous value for its condition.
    pub fn merge(&mut self, event: &TelemetryEvent) {
        match event {
            TelemetryEvent::EventCompletion { event_type } => {
                let entry = self.events.entry(event_type.clone()).or_default();
                entry.completed = entry.completed.saturating_add(1);
            },
            TelemetryEvent::TimeBased { condition, seconds } => {
                self.times.insert(condition.clone(), *seconds);
            },
            TelemetryEvent::CountBased { condition, delta } => {
                let entry = self.counts.entry(condition.clone()).or_insert(0);
                *entry = entry.saturating_add(*delta);
            },
            TelemetryEvent::CommunityInteraction { condition } => {
                let entry = self.community.entry(condition.clone()).or_insert(0);
                *entry = entry.saturating_add(1);
            },
            TelemetryEvent::FirstPlace { condition } => {
                let entry = self.first_place.entry(condition.clone()).or_insert(0);
                *entry = entry.saturating_add(1);
            },
            TelemetryEvent::CollectionProgress { condition, delta } => {
                let entry = self.collections.entry(condition.clone()).or_insert(0);
                *entry = entry.saturating_add(*delta);
            },
        }
    }
}

const fn default_delta() -> u64 {
    1
}

/// A telemetry event produced by game, event, or community modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// One completed run of an event type.
    EventCompletion {
        /// Event type whose completion counter is incremented.
        event_type: String,
    },
    /// A timed result in seconds, replacing the previous observation.
    TimeBased {
        /// Condition key into the `times` namespace.
        condition: String,
        /// Observed time in seconds.
        seconds: f64,
    },
    /// A counter increment (delta defaults to 1).
    CountBased {
        /// Condition key into the `counts` namespace.
        condition: String,
        /// Amount to add.
        #[serde(default = "default_delta")]
        delta: u64,
    },
    /// One community interaction.
    CommunityInteraction {
        /// Condition key into the `community` namespace.
        condition: String,
    },
    /// One first-place finish.
    FirstPlace {
        /// Condition key into the `first_place` namespace.
        condition: String,
    },
    /// Collection progress (delta defaults to 1).
    CollectionProgress {
        /// Condition key into the `collections` namespace.
        condition: String,
        /// Amount to add.
        #[serde(default = "default_delta")]
        delta: u64,
    },
}
