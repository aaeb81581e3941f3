// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rule evaluation, progress calculation, and the status state machine.
//!
//! Rule satisfaction is a pure function of (rule, telemetry). The
//! unlock decision is the AND over an achievement's rules; fractional
//! progress is the unweighted mean of per-rule fractions, so an
//! achievement can sit at 80% progress while still locked.

#![allow(clippy::cast_precision_loss)] // thresholds are small counters

use serde::{Deserialize, Serialize};

use crate::catalog::AchievementDefinition;
use crate::telemetry::Telemetry;

/// One unlock rule.
///
/// A closed tagged union: every rule kind the evaluator understands is
/// a variant, and anything else deserializes to [`Rule::Unknown`],
/// which fails closed. An achievement can never unlock through a rule
/// type the evaluator does not recognize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    /// Satisfied once an event type has been completed `value` times.
    EventCompletion {
        /// Event type whose completion counter is read.
        event_type: String,
        /// Required completion count.
        value: u64,
    },
    /// Satisfied while the last-observed time is within the limit.
    TimeBased {
        /// Condition key into the `times` namespace.
        condition: String,
        /// Maximum allowed time in seconds.
        time_limit_secs: f64,
    },
    /// Satisfied once a counter reaches the threshold.
    CountBased {
        /// Condition key into the `counts` namespace.
        condition: String,
        /// Required count.
        value: u64,
    },
    /// Satisfied once enough first-place finishes are recorded.
    FirstPlace {
        /// Condition key into the `first_place` namespace.
        condition: String,
        /// Required count.
        value: u64,
    },
    /// Satisfied once enough community interactions are recorded.
    CommunityInteraction {
        /// Condition key into the `community` namespace.
        condition: String,
        /// Required count.
        value: u64,
    },
    /// Satisfied once a collection counter reaches the threshold.
    CollectionComplete {
        /// Condition key into the `collections` namespace.
        condition: String,
        /// Required count.
        value: u64,
    },
    /// Unrecognized rule type; always fails.
    #[serde(other)]
    Unknown,
}

impl Rule {
    /// Returns true if this rule is satisfied by the telemetry.
    ///
    /// An absent namespace entry fails the rule; [`Rule::Unknown`]
    /// always fails.
    #[must_use]
    pub fn satisfied_by(&self, telemetry: &Telemetry) -> bool {
        match self {
            Self::EventCompletion { event_type, value } => telemetry
                .events
                .get(event_type)
                .is_some_and(|p| p.completed >= *value),
            Self::TimeBased {
                condition,
                time_limit_secs,
            } => telemetry
                .times
                .get(condition)
                .is_some_and(|t| *t <= *time_limit_secs),
            Self::CountBased { condition, value } => {
                telemetry.counts.get(condition).is_some_and(|n| *n >= *value)
            },
            Self::FirstPlace { condition, value } => telemetry
                .first_place
                .get(condition)
                .is_some_and(|n| *n >= *value),
            Self::CommunityInteraction { condition, value } => telemetry
                .community
                .get(condition)
                .is_some_and(|n| *n >= *value),
            Self::CollectionComplete { condition, value } => telemetry
                .collections
                .get(condition)
                .is_some_and(|n| *n >= *value),
            Self::Unknown => false,
        }
    }

    /// Fractional progress toward this rule, in `[0, 1]`.
    ///
    /// Counter rules report `observed / threshold` capped at 1; time
    /// rules report how far inside the limit the last observation sits;
    /// the remaining kinds are binary on satisfaction.
    #[must_use]
    pub fn progress_fraction(&self, telemetry: &Telemetry) -> f64 {
        match self {
            Self::EventCompletion { event_type, value } => {
                let completed = telemetry
                    .events
                    .get(event_type)
                    .map_or(0, |p| p.completed);
                ratio(completed, *value, self.satisfied_by(telemetry))
            },
            Self::CountBased { condition, value } => {
                let count = telemetry.counts.get(condition).copied().unwrap_or(0);
                ratio(count, *value, self.satisfied_by(telemetry))
            },
            Self::TimeBased {
                condition,
                time_limit_secs,
            } => {
                if *time_limit_secs <= 0.0 {
                    return 0.0;
                }
                match telemetry.times.get(condition) {
                    Some(time) => (1.0 - time / time_limit_secs).max(0.0),
                    None => 0.0,
                }
            },
            _ => {
                if self.satisfied_by(telemetry) {
                    1.0
                } else {
                    0.0
                }
            },
        }
    }
}

/// Capped observed/threshold ratio; a zero threshold degenerates to
/// the binary satisfied fraction instead of dividing by zero.
fn ratio(observed: u64, threshold: u64, satisfied: bool) -> f64 {
    if threshold == 0 {
        return if satisfied { 1.0 } else { 0.0 };
    }
    (observed as f64 / threshold as f64).min(1.0)
}

impl AchievementDefinition {
    /// Returns true if every rule is satisfied.
    #[must_use]
    pub fn check_unlock(&self, telemetry: &Telemetry) -> bool {
        self.rules.iter().all(|rule| rule.satisfied_by(telemetry))
    }

    /// Overall fractional progress in `[0, 1]`: the unweighted mean of
    /// per-rule fractions.
    #[must_use]
    pub fn progress(&self, telemetry: &Telemetry) -> f64 {
        if self.rules.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .rules
            .iter()
            .map(|rule| rule.progress_fraction(telemetry))
            .sum();
        sum / self.rules.len() as f64
    }
}

/// Unlock status of one (user, achievement) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AchievementStatus {
    /// No progress yet.
    Locked,
    /// Partial progress.
    InProgress,
    /// Fully unlocked.
    Unlocked,
}

impl Default for AchievementStatus {
    fn default() -> Self {
        Self::Locked
    }
}

/// One status resolution: the resolved state plus the fractional
/// progress that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Resolved status.
    pub status: AchievementStatus,
    /// Fractional progress in `[0, 1]`.
    pub fraction: f64,
}

/// Resolves the status of one achievement against a telemetry snapshot.
///
/// Availability gates the unlock transition only: an unavailable
/// achievement still reports in-progress for display, but never
/// resolves to unlocked regardless of its rules.
#[must_use]
pub fn resolve(definition: &AchievementDefinition, telemetry: &Telemetry, now_ms: i64) -> Resolution {
    let fraction = definition.progress(telemetry);

    if definition.check_unlock(telemetry) && definition.is_available(now_ms) {
        return Resolution {
            status: AchievementStatus::Unlocked,
            fraction,
        };
    }

    let status = if fraction > 0.0 {
        AchievementStatus::InProgress
    } else {
        AchievementStatus::Locked
    };
    Resolution { status, fraction }
}
