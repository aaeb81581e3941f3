// SPDX-License-Identifier: MIT OR Apache-2.0
//! Achievement catalog: immutable definitions loaded once per process.
//!
//! Definitions are pure data; all unlock behavior lives in the rule
//! evaluator. Malformed entries are rejected at load time and never
//! reach evaluation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::rules::Rule;

/// Achievement category for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Goals tied to a single game.
    GameSpecific,
    /// Platform-wide milestones.
    Platform,
    /// Community participation goals.
    Community,
    /// Collection and trading goals.
    Collector,
    /// Repeating event goals.
    Recurring,
    /// Time-window exclusive goals.
    Limited,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 6] = [
        Self::GameSpecific,
        Self::Platform,
        Self::Community,
        Self::Collector,
        Self::Recurring,
        Self::Limited,
    ];

    /// Returns the display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::GameSpecific => "Game-Specific",
            Self::Platform => "Platform",
            Self::Community => "Community",
            Self::Collector => "Collector",
            Self::Recurring => "Recurring",
            Self::Limited => "Limited",
        }
    }
}

/// Trophy tier determining fixed point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrophyTier {
    /// Entry-level trophies.
    Bronze,
    /// Mid-tier trophies.
    Silver,
    /// High-tier trophies.
    Gold,
    /// Top-tier trophies.
    Platinum,
}

impl TrophyTier {
    /// All tiers, ascending.
    pub const ALL: [Self; 4] = [Self::Bronze, Self::Silver, Self::Gold, Self::Platinum];

    /// Returns the trophy point value for this tier.
    #[must_use]
    pub const fn points(&self) -> u64 {
        match self {
            Self::Bronze => 15,
            Self::Silver => 30,
            Self::Gold => 90,
            Self::Platinum => 300,
        }
    }

    /// Returns the display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        }
    }
}

/// Five-level scarcity label, independent of trophy tier.
///
/// Ordered from most to least common; the derived ordering is used to
/// pick a user's rarest unlock and to gate ticker broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    /// Most users unlock these.
    Common,
    /// Somewhat uncommon.
    Uncommon,
    /// Held by a minority.
    Rare,
    /// Held by a small fraction.
    Epic,
    /// The scarcest label.
    Legendary,
}

impl Rarity {
    /// All rarities, ascending.
    pub const ALL: [Self; 5] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
    ];

    /// Numeric rank, 1 (common) to 5 (legendary).
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Common => 1,
            Self::Uncommon => 2,
            Self::Rare => 3,
            Self::Epic => 4,
            Self::Legendary => 5,
        }
    }

    /// Returns the display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        }
    }
}

/// Whether an achievement is shown to other users.
///
/// Irrelevant to unlock logic; carried for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to everyone.
    Public,
    /// Visible to the owner only.
    Private,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Public
    }
}

/// Inclusive availability window for limited achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Window start, epoch milliseconds.
    pub start_ms: i64,
    /// Window end, epoch milliseconds.
    pub end_ms: i64,
}

impl TimeWindow {
    /// Returns true if `now_ms` falls inside the window (inclusive on
    /// both bounds).
    #[must_use]
    pub const fn contains(&self, now_ms: i64) -> bool {
        self.start_ms <= now_ms && now_ms <= self.end_ms
    }
}

/// Optional cosmetic rewards granted on unlock, opaque to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockRewards {
    /// Profile title granted on unlock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Cosmetic item id granted on unlock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cosmetic: Option<String>,
}

/// An achievement definition.
///
/// Immutable once loaded; `title`, `description` and `icon` are
/// presentation strings the engine never interprets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDefinition {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub title: String,
    /// Description of how to unlock.
    pub description: String,
    /// Display icon.
    #[serde(default)]
    pub icon: String,
    /// Grouping category.
    pub category: Category,
    /// Trophy tier.
    pub trophy_tier: TrophyTier,
    /// Scarcity label.
    pub rarity: Rarity,
    /// XP awarded on unlock.
    pub xp_reward: u64,
    /// Unlock rules; all must be satisfied. Never empty after load.
    pub rules: Vec<Rule>,
    /// Whether the achievement can be unlocked repeatedly.
    #[serde(default)]
    pub repeatable: bool,
    /// Whether the achievement is only available inside `window`.
    #[serde(default)]
    pub limited: bool,
    /// Availability window; required when `limited` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,
    /// Presentation visibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Cosmetic rewards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewards: Option<UnlockRewards>,
}

impl AchievementDefinition {
    /// Returns true if the achievement can be unlocked at `now_ms`.
    ///
    /// Non-limited achievements are always available. Limited ones are
    /// available only inside their window; a limited achievement whose
    /// rules are all satisfied outside the window stays locked.
    #[must_use]
    pub fn is_available(&self, now_ms: i64) -> bool {
        if !self.limited {
            return true;
        }
        self.window.is_some_and(|w| w.contains(now_ms))
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.id.is_empty() {
            return Err("empty id".to_string());
        }
        if self.rules.is_empty() {
            return Err("empty rule list".to_string());
        }
        if self.limited {
            match self.window {
                None => return Err("limited without a time window".to_string()),
                Some(w) if w.end_ms < w.start_ms => {
                    return Err("window ends before it starts".to_string());
                },
                Some(_) => {},
            }
        }
        Ok(())
    }
}

/// On-disk catalog shape: `{ "achievements": [...] }`.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    achievements: Vec<AchievementDefinition>,
}

/// Immutable, validated achievement catalog.
///
/// Malformed definitions are logged and excluded at construction; they
/// never participate in evaluation.
#[derive(Debug, Default)]
pub struct Catalog {
    defs: Vec<AchievementDefinition>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from definitions, dropping invalid entries.
    ///
    /// Rejected entries (empty rule lists, limited achievements
    /// without windows, inverted windows, duplicate ids) are logged at
    /// `warn` and skipped.
    #[must_use]
    pub fn from_definitions(definitions: Vec<AchievementDefinition>) -> Self {
        let mut defs = Vec::with_capacity(definitions.len());
        let mut by_id = HashMap::with_capacity(definitions.len());

        for def in definitions {
            if let Err(reason) = def.validate() {
                warn!(id = %def.id, %reason, "rejecting malformed achievement definition");
                continue;
            }
            if by_id.contains_key(&def.id) {
                warn!(id = %def.id, "rejecting duplicate achievement definition");
                continue;
            }
            by_id.insert(def.id.clone(), defs.len());
            defs.push(def);
        }

        Self { defs, by_id }
    }

    /// Parses a catalog from its JSON source.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::InvalidCatalog`] if the document
    /// itself cannot be parsed. Individually malformed definitions are
    /// skipped, not propagated.
    pub fn from_json(source: &str) -> crate::Result<Self> {
        let file: CatalogFile = serde_json::from_str(source)
            .map_err(|e| crate::EngineError::InvalidCatalog(e.to_string()))?;
        Ok(Self::from_definitions(file.achievements))
    }

    /// Looks up a definition by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AchievementDefinition> {
        self.by_id.get(id).map(|&idx| &self.defs[idx])
    }

    /// Returns true if the catalog contains `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Iterates definitions in load order.
    pub fn iter(&self) -> impl Iterator<Item = &AchievementDefinition> {
        self.defs.iter()
    }

    /// Number of valid definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns true if the catalog holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// All definitions as a slice.
    #[must_use]
    pub fn definitions(&self) -> &[AchievementDefinition] {
        &self.defs
    }
}
