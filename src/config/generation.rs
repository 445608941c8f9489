//! Generation and output configuration

use anyhow::{anyhow, Result};
use capsule_generator::GenerationOptions;
use capsule_parser::MigrationMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Requested migration mode
    #[serde(default)]
    pub mode: MigrationMode,

    /// Run the formatting pass before writing
    #[serde(default = "default_true")]
    pub format: bool,
}

impl GenerationConfig {
    pub fn options(&self) -> GenerationOptions {
        GenerationOptions::default().with_format(self.format)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            mode: MigrationMode::Auto,
            format: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root under which each capsule gets `<id>/` and reports go to `reports/`
    pub base_path: PathBuf,
}

impl OutputConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_path.as_os_str().is_empty() {
            return Err(anyhow!("Output base path cannot be empty"));
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./migrated"),
        }
    }
}

fn default_true() -> bool {
    true
}
