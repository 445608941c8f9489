//! Main configuration structure and implementation

use anyhow::{anyhow, Context, Result};
use capsule_parser::ParserConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{BatchSettings, GenerationConfig, OutputConfig, ValidationConfig};

pub const CONFIG_VERSION: &str = "1.0";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Source discovery
    #[serde(default)]
    pub parser: ParserConfig,

    /// Generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Compile-diagnostic settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Batch scheduling
    #[serde(default)]
    pub batch: BatchSettings,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {path:?}"))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {path:?}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.version != CONFIG_VERSION {
            return Err(anyhow!(
                "Unsupported configuration version: {}",
                self.version
            ));
        }

        for pattern in &self.parser.exclude_patterns {
            glob::Pattern::new(pattern)
                .map_err(|e| anyhow!("Invalid exclude pattern '{}': {}", pattern, e))?;
        }

        self.validation.validate()?;
        self.batch.validate()?;
        self.output.validate()?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            parser: ParserConfig::default(),
            generation: GenerationConfig::default(),
            validation: ValidationConfig::default(),
            batch: BatchSettings::default(),
            output: OutputConfig::default(),
        }
    }
}
