//! Validation result types and the quality score

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Each error costs this many points, up to [`MAX_ERROR_PENALTY`]
pub const ERROR_PENALTY: f64 = 5.0;
pub const MAX_ERROR_PENALTY: f64 = 30.0;

/// Each warning costs this many points, up to [`MAX_WARNING_PENALTY`]
pub const WARNING_PENALTY: f64 = 2.0;
pub const MAX_WARNING_PENALTY: f64 = 20.0;

/// One named pass/fail check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub name: String,
    pub passed: bool,
    pub message: String,
}

impl ValidationCheck {
    pub fn pass(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.into(),
        }
    }
}

/// A compiler or syntax diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub file: PathBuf,
    pub line: usize,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.file.display(), self.line, self.message)
    }
}

/// Outcome of validating one capsule directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// In `[0, 100]`
    pub quality_score: f64,
    pub checks: Vec<ValidationCheck>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Assemble a result; validity and score are derived, never set
    pub fn from_parts(
        checks: Vec<ValidationCheck>,
        errors: Vec<String>,
        warnings: Vec<String>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let passed = checks.iter().filter(|c| c.passed).count();
        let quality_score = quality_score(passed, checks.len(), errors.len(), warnings.len());
        Self {
            is_valid: errors.is_empty(),
            quality_score,
            checks,
            errors,
            warnings,
            diagnostics,
        }
    }

    pub fn check(&self, name: &str) -> Option<&ValidationCheck> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn passed_checks(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }
}

/// `passed / total * 100 - min(errors * 5, 30) - min(warnings * 2, 20)`,
/// clamped to `[0, 100]`
pub fn quality_score(passed: usize, total: usize, errors: usize, warnings: usize) -> f64 {
    let ratio = if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    };
    let error_penalty = (errors as f64 * ERROR_PENALTY).min(MAX_ERROR_PENALTY);
    let warning_penalty = (warnings as f64 * WARNING_PENALTY).min(MAX_WARNING_PENALTY);
    (ratio - error_penalty - warning_penalty).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(7, 7, 0, 0, 100.0)]
    #[case(7, 7, 0, 1, 98.0)]
    #[case(6, 8, 1, 0, 70.0)]
    #[case(4, 8, 10, 0, 20.0)]
    #[case(4, 8, 10, 20, 0.0)]
    #[case(0, 0, 0, 0, 0.0)]
    fn test_quality_score(
        #[case] passed: usize,
        #[case] total: usize,
        #[case] errors: usize,
        #[case] warnings: usize,
        #[case] expected: f64,
    ) {
        assert!((quality_score(passed, total, errors, warnings) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_result_validity_follows_errors() {
        let result = ValidationResult::from_parts(
            vec![
                ValidationCheck::pass("directory_exists", "ok"),
                ValidationCheck::fail("required_files", "missing README.md"),
            ],
            vec!["missing README.md".to_string()],
            Vec::new(),
            Vec::new(),
        );
        assert!(!result.is_valid);
        assert_eq!(result.quality_score, 45.0);
        assert_eq!(result.passed_checks(), 1);
        assert!(!result.check("required_files").unwrap().passed);
    }

    proptest! {
        #[test]
        fn prop_quality_score_bounded(
            total in 0usize..50,
            passed_frac in 0.0f64..=1.0,
            errors in 0usize..1000,
            warnings in 0usize..1000,
        ) {
            let passed = (total as f64 * passed_frac) as usize;
            let score = quality_score(passed, total, errors, warnings);
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }
}
