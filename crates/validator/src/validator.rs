//! Capsule validator
//!
//! Runs the structural and compile-diagnostic checks over a generated capsule
//! directory. Nothing here returns an error: every failure is folded into the
//! [`ValidationResult`].

use capsule_generator::templates::readme::README_SECTIONS;
use capsule_generator::{required_files, FileKind};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::checks::{
    count_error_kinds, index_shape, missing_readme_sections, service_shape, MIN_ERROR_KINDS,
    MIN_README_BYTES,
};
use crate::diagnostics::{DiagnosticsProvider, SyntaxDiagnostics, TscDiagnostics};
use crate::result::{Diagnostic, ValidationCheck, ValidationResult};

pub const CHECK_DIRECTORY_EXISTS: &str = "directory_exists";
pub const CHECK_REQUIRED_FILES: &str = "required_files";
pub const CHECK_COMPILE_DIAGNOSTICS: &str = "compile_diagnostics";
pub const CHECK_ERROR_TYPES: &str = "error_types";
pub const CHECK_SERVICE_LIFECYCLE: &str = "service_lifecycle";
pub const CHECK_INDEX_EXPORTS: &str = "index_exports";
pub const CHECK_README_SECTIONS: &str = "readme_sections";

/// Diagnostics surfaced as individual errors before the rest are summarised
const MAX_REPORTED_DIAGNOSTICS: usize = 20;

pub struct CapsuleValidator {
    provider: Box<dyn DiagnosticsProvider>,
}

impl Default for CapsuleValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl CapsuleValidator {
    /// A validator type-checking with `tsc` from `PATH`
    ///
    /// Without a compiler the run records a warning and falls back to syntax
    /// diagnostics.
    pub fn new() -> Self {
        Self {
            provider: Box::new(TscDiagnostics::default()),
        }
    }

    /// A validator that only looks for syntax errors
    pub fn syntax_only() -> Self {
        Self {
            provider: Box::new(SyntaxDiagnostics),
        }
    }

    pub fn with_provider(provider: Box<dyn DiagnosticsProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn validate(&self, dir: &Path) -> ValidationResult {
        info!("Validating capsule at {:?}", dir);
        let mut run = Run::default();

        if !dir.is_dir() {
            let message = format!("Capsule directory {} does not exist", dir.display());
            run.fail(CHECK_DIRECTORY_EXISTS, message);
            return run.finish();
        }
        run.pass(CHECK_DIRECTORY_EXISTS, "Capsule directory exists");

        let missing: Vec<&str> = required_files()
            .into_iter()
            .filter(|name| !dir.join(name).is_file())
            .collect();
        if missing.is_empty() {
            run.pass(CHECK_REQUIRED_FILES, "All 8 required files present");
        } else {
            run.fail(
                CHECK_REQUIRED_FILES,
                format!("Missing required files: {}", missing.join(", ")),
            );
        }

        self.check_diagnostics(dir, &missing, &mut run).await;

        let errors_ts = read_optional(dir, FileKind::Errors).await;
        let service_ts = read_optional(dir, FileKind::Service).await;
        let index_ts = read_optional(dir, FileKind::Index).await;
        let readme = read_optional(dir, FileKind::Readme).await;

        check_error_types(errors_ts.as_deref(), &mut run);
        check_service(service_ts.as_deref(), &mut run);
        check_index(index_ts.as_deref(), &mut run);
        check_readme(readme.as_deref(), &mut run);

        let result = run.finish();
        info!(
            "Validation of {:?}: {} ({}/{} checks, score {:.1})",
            dir,
            if result.is_valid { "valid" } else { "invalid" },
            result.passed_checks(),
            result.checks.len(),
            result.quality_score
        );
        result
    }

    async fn check_diagnostics(&self, dir: &Path, missing: &[&str], run: &mut Run) {
        let sources: Vec<&str> = FileKind::ALL
            .iter()
            .filter(|kind| kind.is_source())
            .map(|kind| kind.file_name())
            .filter(|name| !missing.contains(name))
            .collect();

        if sources.is_empty() {
            run.fail(CHECK_COMPILE_DIAGNOSTICS, "No TypeScript sources to check");
            return;
        }

        let diagnostics = match self.provider.diagnose(dir, &sources).await {
            Ok(diagnostics) => diagnostics,
            Err(e) => {
                warn!("{} diagnostics unavailable: {}", self.provider.name(), e);
                run.warn(format!(
                    "{} diagnostics unavailable ({}); fell back to syntax diagnostics",
                    self.provider.name(),
                    e
                ));
                match SyntaxDiagnostics.diagnose(dir, &sources).await {
                    Ok(diagnostics) => diagnostics,
                    Err(e) => {
                        run.fail(
                            CHECK_COMPILE_DIAGNOSTICS,
                            format!("Diagnostics could not run: {e}"),
                        );
                        return;
                    }
                }
            }
        };

        debug!("{} diagnostics for {:?}", diagnostics.len(), dir);
        if diagnostics.is_empty() {
            run.pass(
                CHECK_COMPILE_DIAGNOSTICS,
                format!("{} files compile without diagnostics", sources.len()),
            );
        } else {
            run.check(ValidationCheck::fail(
                CHECK_COMPILE_DIAGNOSTICS,
                format!("{} compile diagnostics", diagnostics.len()),
            ));
            run.add_diagnostics(diagnostics);
        }
    }
}

async fn read_optional(dir: &Path, kind: FileKind) -> Option<String> {
    tokio::fs::read_to_string(dir.join(kind.file_name())).await.ok()
}

fn check_error_types(content: Option<&str>, run: &mut Run) {
    let Some(content) = content else {
        run.fail(CHECK_ERROR_TYPES, "errors.ts not found");
        return;
    };
    let count = count_error_kinds(content);
    if count >= MIN_ERROR_KINDS {
        run.pass(CHECK_ERROR_TYPES, format!("{count} error types defined"));
    } else {
        run.fail(
            CHECK_ERROR_TYPES,
            format!("Only {count} error types defined, at least {MIN_ERROR_KINDS} required"),
        );
    }
}

fn check_service(content: Option<&str>, run: &mut Run) {
    let Some(content) = content else {
        run.fail(CHECK_SERVICE_LIFECYCLE, "service.ts not found");
        return;
    };
    let shape = service_shape(content);
    if shape.is_complete() {
        run.pass(CHECK_SERVICE_LIFECYCLE, "Service implements initialize/execute/cleanup");
    } else if !shape.has_service_class {
        run.fail(CHECK_SERVICE_LIFECYCLE, "No service class found");
    } else {
        run.fail(
            CHECK_SERVICE_LIFECYCLE,
            format!("Service is missing: {}", shape.missing_members.join(", ")),
        );
    }
    if !shape.has_get_state {
        run.warn("Service has no getState() accessor".to_string());
    }
}

fn check_index(content: Option<&str>, run: &mut Run) {
    let Some(content) = content else {
        run.fail(CHECK_INDEX_EXPORTS, "index.ts not found");
        return;
    };
    let shape = index_shape(content);
    match (shape.has_wildcard_export, shape.has_metadata) {
        (true, true) => run.pass(CHECK_INDEX_EXPORTS, "Index re-exports modules and metadata"),
        (false, _) => run.fail(CHECK_INDEX_EXPORTS, "Index has no `export * from` re-exports"),
        (true, false) => run.fail(CHECK_INDEX_EXPORTS, "Index does not export CAPSULE_METADATA"),
    }
    if !shape.has_default_export {
        run.warn("Index has no default export".to_string());
    }
}

fn check_readme(content: Option<&str>, run: &mut Run) {
    let Some(content) = content else {
        run.fail(CHECK_README_SECTIONS, "README.md not found");
        return;
    };
    let missing = missing_readme_sections(content, &README_SECTIONS);
    if missing.is_empty() {
        run.pass(
            CHECK_README_SECTIONS,
            format!("README has all {} sections", README_SECTIONS.len()),
        );
    } else {
        run.fail(
            CHECK_README_SECTIONS,
            format!("README is missing sections: {}", missing.join(", ")),
        );
    }
    if content.len() < MIN_README_BYTES {
        run.warn(format!(
            "README is only {} bytes (expected at least {MIN_README_BYTES})",
            content.len()
        ));
    }
}

/// Accumulates one validation pass
#[derive(Default)]
struct Run {
    checks: Vec<ValidationCheck>,
    errors: Vec<String>,
    warnings: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Run {
    fn pass(&mut self, name: &str, message: impl Into<String>) {
        self.checks.push(ValidationCheck::pass(name, message));
    }

    fn fail(&mut self, name: &str, message: impl Into<String>) {
        let check = ValidationCheck::fail(name, message);
        self.errors.push(check.message.clone());
        self.checks.push(check);
    }

    fn check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    fn add_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in diagnostics.iter().take(MAX_REPORTED_DIAGNOSTICS) {
            self.errors.push(diagnostic.to_string());
        }
        if diagnostics.len() > MAX_REPORTED_DIAGNOSTICS {
            self.errors.push(format!(
                "... and {} more diagnostics",
                diagnostics.len() - MAX_REPORTED_DIAGNOSTICS
            ));
        }
        self.diagnostics.extend(diagnostics);
    }

    fn finish(self) -> ValidationResult {
        ValidationResult::from_parts(self.checks, self.errors, self.warnings, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticsError;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Failing;

    #[async_trait]
    impl DiagnosticsProvider for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn diagnose(&self, _dir: &Path, _files: &[&str]) -> Result<Vec<Diagnostic>, DiagnosticsError> {
            Err(DiagnosticsError::CompilerNotFound("not installed".to_string()))
        }
    }

    struct Reporting(usize);

    #[async_trait]
    impl DiagnosticsProvider for Reporting {
        fn name(&self) -> &str {
            "reporting"
        }

        async fn diagnose(&self, _dir: &Path, _files: &[&str]) -> Result<Vec<Diagnostic>, DiagnosticsError> {
            Ok((0..self.0)
                .map(|i| Diagnostic {
                    message: format!("TS2304: Cannot find name 'x{i}'."),
                    file: PathBuf::from("service.ts"),
                    line: i + 1,
                })
                .collect())
        }
    }

    #[test]
    fn test_default_provider_is_tsc() {
        assert_eq!(CapsuleValidator::new().provider_name(), "tsc");
        assert_eq!(CapsuleValidator::syntax_only().provider_name(), "syntax");
    }

    #[tokio::test]
    async fn test_missing_directory_stops_early() {
        let temp_dir = TempDir::new().unwrap();
        let result = CapsuleValidator::syntax_only()
            .validate(&temp_dir.path().join("absent"))
            .await;

        assert!(!result.is_valid);
        assert_eq!(result.checks.len(), 1);
        assert_eq!(result.checks[0].name, CHECK_DIRECTORY_EXISTS);
        assert_eq!(result.quality_score, 0.0);
    }

    #[tokio::test]
    async fn test_empty_directory_fails_every_check() {
        let temp_dir = TempDir::new().unwrap();
        let result = CapsuleValidator::syntax_only().validate(temp_dir.path()).await;

        assert!(!result.is_valid);
        assert_eq!(result.checks.len(), 7);
        assert_eq!(result.passed_checks(), 1);
        assert!(result.errors[0].contains("types.ts"));
    }

    #[tokio::test]
    async fn test_hand_written_capsule() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        for name in required_files() {
            std::fs::write(dir.join(name), "export {};\n").unwrap();
        }
        let kinds: String = (0..8)
            .map(|i| format!("  KIND_{i} = 'KIND_{i}',\n"))
            .collect();
        std::fs::write(dir.join("errors.ts"), format!("export enum ErrorCode {{\n{kinds}}}\n")).unwrap();
        std::fs::write(
            dir.join("service.ts"),
            "export class TinyService {\n  async initialize(): Promise<void> {}\n  async execute<T>(op: () => Promise<T>): Promise<T> { return op(); }\n  async cleanup(): Promise<void> {}\n}\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("index.ts"),
            "export * from './types';\nexport const CAPSULE_METADATA = { id: 'tiny' } as const;\n",
        )
        .unwrap();
        std::fs::write(dir.join("README.md"), "# Tiny\n\n## Overview\n\n## Installation\n\n## Usage\n\n## API\n").unwrap();

        let result = CapsuleValidator::syntax_only().validate(dir).await;

        assert!(result.is_valid, "{:?}", result.errors);
        assert_eq!(result.passed_checks(), 7);
        // no getState, no default export, short README
        assert_eq!(result.warnings.len(), 3);
        assert_eq!(result.quality_score, 94.0);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_syntax() {
        let temp_dir = TempDir::new().unwrap();
        for name in required_files() {
            std::fs::write(temp_dir.path().join(name), "export {};\n").unwrap();
        }

        let result = CapsuleValidator::with_provider(Box::new(Failing))
            .validate(temp_dir.path())
            .await;

        assert!(result.check(CHECK_COMPILE_DIAGNOSTICS).unwrap().passed);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("fell back to syntax diagnostics")));
    }

    #[tokio::test]
    async fn test_diagnostics_become_errors() {
        let temp_dir = TempDir::new().unwrap();
        for name in required_files() {
            std::fs::write(temp_dir.path().join(name), "export {};\n").unwrap();
        }

        let result = CapsuleValidator::with_provider(Box::new(Reporting(25)))
            .validate(temp_dir.path())
            .await;

        let check = result.check(CHECK_COMPILE_DIAGNOSTICS).unwrap();
        assert!(!check.passed);
        assert_eq!(result.diagnostics.len(), 25);
        assert!(result.errors.iter().any(|e| e == "service.ts:1: TS2304: Cannot find name 'x0'."));
        assert!(result.errors.iter().any(|e| e == "... and 5 more diagnostics"));
    }
}
