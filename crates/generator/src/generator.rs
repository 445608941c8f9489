//! Capsule generator: renders every template and writes the results

use capsule_parser::{MigrationMode, ParsedCapsule};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::GenerationOptions;
use crate::context::TemplateContext;
use crate::error::{GeneratorError, GeneratorResult};
use crate::formatter::{CodeFormatter, WhitespaceFormatter};
use crate::result::{GeneratedFile, GenerationResult};
use crate::templates::FileKind;

pub struct CapsuleGenerator {
    options: GenerationOptions,
    formatter: Box<dyn CodeFormatter>,
}

impl Default for CapsuleGenerator {
    fn default() -> Self {
        Self::new(GenerationOptions::default())
    }
}

impl CapsuleGenerator {
    pub fn new(options: GenerationOptions) -> Self {
        Self {
            options,
            formatter: Box::new(WhitespaceFormatter),
        }
    }

    /// Replace the formatting pass
    pub fn with_formatter(mut self, formatter: Box<dyn CodeFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Generate the eight capsule files into `output_dir`
    ///
    /// Only a missing or uncreatable output directory is returned as an
    /// error. A failing template or write is recorded in the result and the
    /// remaining files are still generated.
    pub async fn generate(
        &self,
        parsed: &ParsedCapsule,
        output_dir: &Path,
        mode: MigrationMode,
    ) -> GeneratorResult<GenerationResult> {
        let capsule_id = parsed.metadata.id.clone();
        info!(
            "Generating capsule {} into {:?} ({} mode)",
            capsule_id, output_dir, mode
        );

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| GeneratorError::OutputDirectory {
                capsule_id: capsule_id.clone(),
                path: output_dir.to_path_buf(),
                source,
            })?;
        // generated paths are absolute whatever root the caller passed
        let output_dir = &tokio::fs::canonicalize(output_dir).await.map_err(|source| {
            GeneratorError::OutputDirectory {
                capsule_id: capsule_id.clone(),
                path: output_dir.to_path_buf(),
                source,
            }
        })?;

        let ctx = TemplateContext::build(parsed, mode, self.options.timestamp());

        let mut files = Vec::new();
        let mut errors = Vec::new();
        let mut warnings: Vec<String> = ctx
            .preserved
            .skipped
            .iter()
            .map(|s| format!("Skipped original declaration {} in {}: {}", s.name, s.target, s.reason))
            .collect();

        for kind in FileKind::ALL {
            match self.generate_file(kind, &ctx, output_dir).await {
                Ok(file) => {
                    debug!("Generated {:?} ({} bytes)", file.path, file.size);
                    files.push(file);
                }
                Err(e) => {
                    warn!("{}", e);
                    errors.push(format!("[{}] {}", e.code(), e));
                }
            }
        }

        if !self.options.format {
            debug!("Formatting pass disabled");
        }
        if files.len() < FileKind::ALL.len() {
            warnings.push(format!(
                "Only {} of {} files were generated",
                files.len(),
                FileKind::ALL.len()
            ));
        }

        let success = errors.is_empty();
        info!(
            "Generated {} files for capsule {} ({} errors)",
            files.len(),
            capsule_id,
            errors.len()
        );

        Ok(GenerationResult {
            capsule_id,
            output_dir: output_dir.to_path_buf(),
            mode,
            success,
            files,
            errors,
            warnings,
            manual_actions: ctx.manual_actions,
        })
    }

    async fn generate_file(
        &self,
        kind: FileKind,
        ctx: &TemplateContext,
        output_dir: &Path,
    ) -> GeneratorResult<GeneratedFile> {
        let rendered = (kind.template())(ctx).map_err(|source| GeneratorError::Template {
            capsule_id: ctx.metadata.id.clone(),
            file: kind.file_name(),
            source,
        })?;

        let content = if self.options.format {
            self.formatter.format(kind.file_name(), &rendered)
        } else {
            rendered
        };

        let path = output_dir.join(kind.file_name());
        tokio::fs::write(&path, &content)
            .await
            .map_err(|source| GeneratorError::Write {
                capsule_id: ctx.metadata.id.clone(),
                path: path.clone(),
                source,
            })?;

        Ok(GeneratedFile::new(kind, path, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::{fixed_time, sample_capsule};
    use capsule_parser::Platform;
    use tempfile::TempDir;

    fn generator() -> CapsuleGenerator {
        CapsuleGenerator::new(GenerationOptions::default().with_generated_at(fixed_time()))
    }

    #[tokio::test]
    async fn test_generates_all_eight_files() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("email-sender");
        let parsed = sample_capsule(vec![Platform::Node]);

        let result = generator()
            .generate(&parsed, &output, MigrationMode::Auto)
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.errors.is_empty());
        assert_eq!(result.files.len(), 8);
        for kind in FileKind::ALL {
            let path = output.join(kind.file_name());
            assert!(path.is_file(), "{kind} missing");
            let on_disk = std::fs::read_to_string(&path).unwrap();
            assert_eq!(on_disk, result.file(kind).unwrap().content);
        }
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.manual_actions.len(), 1);
    }

    #[tokio::test]
    async fn test_generated_paths_are_absolute() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("scratch")).unwrap();
        let output = temp_dir.path().join("scratch/../email-sender");
        let parsed = sample_capsule(vec![Platform::Node]);

        let result = generator()
            .generate(&parsed, &output, MigrationMode::Auto)
            .await
            .unwrap();

        assert!(result.output_dir.is_absolute());
        assert!(result.output_dir.ends_with("email-sender"));
        for file in &result.files {
            assert!(file.path.is_absolute(), "{:?}", file.path);
            assert!(!file
                .path
                .components()
                .any(|c| c == std::path::Component::ParentDir));
            assert!(file.path.starts_with(&result.output_dir));
        }
    }

    #[tokio::test]
    async fn test_generation_is_deterministic_for_fixed_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let parsed = sample_capsule(vec![Platform::Node, Platform::Web]);

        let first = generator()
            .generate(&parsed, &temp_dir.path().join("a"), MigrationMode::Semi)
            .await
            .unwrap();
        let second = generator()
            .generate(&parsed, &temp_dir.path().join("b"), MigrationMode::Semi)
            .await
            .unwrap();

        let checksums = |r: &GenerationResult| r.files.iter().map(|f| f.checksum.clone()).collect::<Vec<_>>();
        assert_eq!(checksums(&first), checksums(&second));
    }

    #[tokio::test]
    async fn test_only_index_changes_with_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let parsed = sample_capsule(vec![Platform::Node]);

        let first = generator()
            .generate(&parsed, &temp_dir.path().join("a"), MigrationMode::Auto)
            .await
            .unwrap();
        let later = CapsuleGenerator::new(
            GenerationOptions::default()
                .with_generated_at(fixed_time() + chrono::Duration::hours(1)),
        )
        .generate(&parsed, &temp_dir.path().join("b"), MigrationMode::Auto)
        .await
        .unwrap();

        for kind in FileKind::ALL {
            let same = first.file(kind).unwrap().checksum == later.file(kind).unwrap().checksum;
            assert_eq!(same, kind != FileKind::Index, "{kind}");
        }
    }

    #[tokio::test]
    async fn test_write_failure_does_not_stop_other_files() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("email-sender");
        // a directory where types.ts should go makes that one write fail
        std::fs::create_dir_all(output.join("types.ts")).unwrap();
        let parsed = sample_capsule(vec![Platform::Node]);

        let result = generator()
            .generate(&parsed, &output, MigrationMode::Auto)
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("[GENERATE_WRITE]"));
        assert_eq!(result.files.len(), 7);
        assert!(result.file(FileKind::Types).is_none());
        assert!(output.join("README.md").is_file());
    }

    #[tokio::test]
    async fn test_missing_output_parent_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();
        let parsed = sample_capsule(vec![Platform::Node]);

        let err = generator()
            .generate(&parsed, &blocker.join("out"), MigrationMode::Auto)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "GENERATE_OUTPUT_DIRECTORY");
        assert_eq!(err.context(), "email-sender");
    }

    #[tokio::test]
    async fn test_unformatted_output_keeps_template_text() {
        struct Shouting;
        impl CodeFormatter for Shouting {
            fn name(&self) -> &str {
                "shouting"
            }
            fn format(&self, _file_name: &str, content: &str) -> String {
                content.to_uppercase()
            }
        }

        let temp_dir = TempDir::new().unwrap();
        let parsed = sample_capsule(vec![Platform::Node]);

        let formatted = generator()
            .with_formatter(Box::new(Shouting))
            .generate(&parsed, &temp_dir.path().join("a"), MigrationMode::Auto)
            .await
            .unwrap();
        assert!(formatted.file(FileKind::Service).unwrap().content.contains("EXPORT CLASS"));

        let raw = CapsuleGenerator::new(
            GenerationOptions::default()
                .with_format(false)
                .with_generated_at(fixed_time()),
        )
        .with_formatter(Box::new(Shouting))
        .generate(&parsed, &temp_dir.path().join("b"), MigrationMode::Auto)
        .await
        .unwrap();
        assert!(raw.file(FileKind::Service).unwrap().content.contains("export class"));
    }
}
