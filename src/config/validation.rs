//! Validation configuration

use anyhow::{anyhow, Result};
use capsule_validator::{CapsuleValidator, SyntaxDiagnostics, TscDiagnostics};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which compile-diagnostic provider to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticsKind {
    /// Tree-sitter syntax errors only
    Syntax,

    /// `tsc --noEmit --strict`, falling back to syntax when unavailable
    #[default]
    Tsc,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub diagnostics: DiagnosticsKind,

    /// Compiler binary; `tsc` on `PATH` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsc_path: Option<PathBuf>,
}

impl ValidationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tsc_path.is_some() && self.diagnostics != DiagnosticsKind::Tsc {
            return Err(anyhow!(
                "validation.tsc_path is only used with `diagnostics: tsc`"
            ));
        }
        Ok(())
    }

    pub fn validator(&self) -> CapsuleValidator {
        match self.diagnostics {
            DiagnosticsKind::Syntax => CapsuleValidator::with_provider(Box::new(SyntaxDiagnostics)),
            DiagnosticsKind::Tsc => {
                CapsuleValidator::with_provider(Box::new(TscDiagnostics::new(self.tsc_path.clone())))
            }
        }
    }
}
