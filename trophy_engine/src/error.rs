// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the progression engine.

use thiserror::Error;

/// Engine error type.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EngineError {
    /// Referenced achievement id is not present in the catalog.
    ///
    /// Returned by administrative operations only; bulk catalog
    /// iteration skips stale record ids silently since the catalog is
    /// the source of truth.
    #[error("unknown achievement: {0}")]
    UnknownAchievement(String),

    /// Catalog input could not be parsed or contained no valid entries.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// The persistence backend failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Error type for persistence backends.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// The backend failed to read or write user state.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_achievement_display() {
        let err = EngineError::UnknownAchievement("rainbow_road_master".to_string());
        assert_eq!(err.to_string(), "unknown achievement: rainbow_road_master");
    }

    #[test]
    fn test_invalid_catalog_display() {
        let err = EngineError::InvalidCatalog("no valid definitions".to_string());
        assert_eq!(err.to_string(), "invalid catalog: no valid definitions");
    }

    #[test]
    fn test_store_error_conversion() {
        let err: EngineError = StoreError::Backend("row locked".to_string()).into();
        assert_eq!(err.to_string(), "store error: backend error: row locked");
    }
}
