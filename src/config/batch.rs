//! Batch scheduling configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PARALLEL: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Capsules migrated concurrently per group
    #[serde(default = "default_parallel")]
    pub parallel: usize,

    /// Abort the run after the first failed capsule's group
    #[serde(default)]
    pub stop_on_error: bool,

    /// Persist per-capsule and batch reports
    #[serde(default = "default_save_reports")]
    pub save_reports: bool,
}

impl BatchSettings {
    pub fn validate(&self) -> Result<()> {
        if self.parallel == 0 {
            return Err(anyhow!("batch.parallel must be at least 1"));
        }
        Ok(())
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            parallel: DEFAULT_PARALLEL,
            stop_on_error: false,
            save_reports: true,
        }
    }
}

fn default_parallel() -> usize {
    DEFAULT_PARALLEL
}

fn default_save_reports() -> bool {
    true
}
