//! Migration mode selection against fixed complexity thresholds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::types::ComplexityMetrics;

/// Largest capsule recommended for fully mechanical migration (exclusive)
pub const AUTO_MAX_LINES: usize = 500;
pub const AUTO_MAX_COMPLEXITY: u32 = 10;

/// Above either limit an `auto` request is downgraded to `semi`
pub const SEMI_MAX_LINES: usize = 2000;
pub const SEMI_MAX_COMPLEXITY: u32 = 30;

/// How much of a migration is mechanical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationMode {
    /// Fully mechanical
    Auto,

    /// Mechanical, with flagged manual follow-ups
    Semi,

    /// Guidance only
    Manual,
}

impl MigrationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationMode::Auto => "auto",
            MigrationMode::Semi => "semi",
            MigrationMode::Manual => "manual",
        }
    }
}

impl Default for MigrationMode {
    fn default() -> Self {
        MigrationMode::Auto
    }
}

impl fmt::Display for MigrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MigrationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(MigrationMode::Auto),
            "semi" => Ok(MigrationMode::Semi),
            "manual" => Ok(MigrationMode::Manual),
            other => Err(format!(
                "Unknown migration mode '{other}' (expected auto, semi or manual)"
            )),
        }
    }
}

/// Mode picked for a capsule, with the downgrade warning if one happened
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSelection {
    pub requested: MigrationMode,
    pub effective: MigrationMode,
    pub warning: Option<String>,
}

/// Mode the thresholds recommend for a capsule
pub fn recommend_mode(complexity: &ComplexityMetrics) -> MigrationMode {
    let loc = complexity.lines_of_code;
    let cc = complexity.cyclomatic_complexity;

    if loc < AUTO_MAX_LINES && cc < AUTO_MAX_COMPLEXITY {
        MigrationMode::Auto
    } else if loc <= SEMI_MAX_LINES && cc <= SEMI_MAX_COMPLEXITY {
        MigrationMode::Semi
    } else {
        MigrationMode::Manual
    }
}

/// Apply the requested mode; `auto` on an oversized capsule becomes `semi`
pub fn select_mode(
    capsule_id: &str,
    requested: MigrationMode,
    complexity: &ComplexityMetrics,
) -> ModeSelection {
    let exceeds = complexity.lines_of_code > SEMI_MAX_LINES
        || complexity.cyclomatic_complexity > SEMI_MAX_COMPLEXITY;

    if requested == MigrationMode::Auto && exceeds {
        let message = format!(
            "Capsule {} has {} lines and complexity {} (limits {} / {}); downgrading auto migration to semi",
            capsule_id,
            complexity.lines_of_code,
            complexity.cyclomatic_complexity,
            SEMI_MAX_LINES,
            SEMI_MAX_COMPLEXITY
        );
        warn!("{}", message);
        return ModeSelection {
            requested,
            effective: MigrationMode::Semi,
            warning: Some(message),
        };
    }

    ModeSelection {
        requested,
        effective: requested,
        warning: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complexity::{estimate_migration_hours, maintainability_index};

    fn metrics(loc: usize, cc: u32) -> ComplexityMetrics {
        ComplexityMetrics {
            lines_of_code: loc,
            cyclomatic_complexity: cc,
            maintainability_index: maintainability_index(loc, cc),
            estimated_migration_hours: estimate_migration_hours(loc, cc),
            files: Vec::new(),
        }
    }

    #[test]
    fn test_small_capsule_recommends_auto() {
        let m = metrics(150, 4);
        assert_eq!(recommend_mode(&m), MigrationMode::Auto);
        assert_eq!(m.estimated_migration_hours, 2.0);

        let selection = select_mode("small", MigrationMode::Auto, &m);
        assert_eq!(selection.effective, MigrationMode::Auto);
        assert!(selection.warning.is_none());
    }

    #[test]
    fn test_large_capsule_downgrades_auto_to_semi() {
        let selection = select_mode("big", MigrationMode::Auto, &metrics(2500, 35));
        assert_eq!(selection.effective, MigrationMode::Semi);
        assert!(selection.warning.unwrap().contains("downgrading"));
    }

    #[test]
    fn test_manual_request_is_kept() {
        let selection = select_mode("big", MigrationMode::Manual, &metrics(2500, 35));
        assert_eq!(selection.effective, MigrationMode::Manual);
        assert!(selection.warning.is_none());
    }

    #[test]
    fn test_complexity_alone_triggers_downgrade() {
        let selection = select_mode("branchy", MigrationMode::Auto, &metrics(100, 31));
        assert_eq!(selection.effective, MigrationMode::Semi);
    }

    #[test]
    fn test_recommendation_bands() {
        assert_eq!(recommend_mode(&metrics(499, 9)), MigrationMode::Auto);
        assert_eq!(recommend_mode(&metrics(500, 9)), MigrationMode::Semi);
        assert_eq!(recommend_mode(&metrics(2000, 30)), MigrationMode::Semi);
        assert_eq!(recommend_mode(&metrics(2001, 5)), MigrationMode::Manual);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("SEMI".parse::<MigrationMode>().unwrap(), MigrationMode::Semi);
        assert!("fast".parse::<MigrationMode>().is_err());
    }
}
