//! Configuration types for the generator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-call generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Run the formatting pass before writing
    #[serde(default = "default_format")]
    pub format: bool,

    /// Fixed "generated at" timestamp; the current time when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

fn default_format() -> bool {
    true
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            format: default_format(),
            generated_at: None,
        }
    }
}

impl GenerationOptions {
    pub fn with_format(mut self, format: bool) -> Self {
        self.format = format;
        self
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    /// Timestamp to embed in the generated index
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.generated_at.unwrap_or_else(Utc::now)
    }
}
