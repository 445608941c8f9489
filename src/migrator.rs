//! Single-capsule pipeline: parse, pick a mode, generate, validate, report

use capsule_generator::CapsuleGenerator;
use capsule_parser::{select_mode, CapsuleParser, MigrationMode, ParsedCapsule};
use capsule_report::{MigrationReport, Reporter};
use capsule_validator::CapsuleValidator;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::MigrationResult;

pub struct CapsuleMigrator {
    parser: CapsuleParser,
    generator: CapsuleGenerator,
    validator: CapsuleValidator,
    reporter: Reporter,
}

impl CapsuleMigrator {
    pub fn new(
        parser: CapsuleParser,
        generator: CapsuleGenerator,
        validator: CapsuleValidator,
        reporter: Reporter,
    ) -> Self {
        Self {
            parser,
            generator,
            validator,
            reporter,
        }
    }

    /// Build every stage from configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CapsuleParser::new(config.parser.clone()),
            CapsuleGenerator::new(config.generation.options()),
            config.validation.validator(),
            Reporter::new(),
        )
    }

    pub fn parser(&self) -> &CapsuleParser {
        &self.parser
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Parse only
    pub async fn analyze(&self, input: &Path) -> MigrationResult<ParsedCapsule> {
        Ok(self.parser.parse_capsule(input).await?)
    }

    /// Migrate one capsule into `<output_root>/<capsule id>/`
    ///
    /// Parse and generation failures are returned as errors; validation
    /// failures only mark the report as failed.
    pub async fn migrate_capsule(
        &self,
        input: &Path,
        output_root: &Path,
        mode: MigrationMode,
    ) -> MigrationResult<MigrationReport> {
        let started = Instant::now();

        let parsed = self.parser.parse_capsule(input).await?;
        let selection = select_mode(&parsed.metadata.id, mode, &parsed.complexity);

        let output_dir = output_root.join(&parsed.metadata.id);
        let mut generation = self
            .generator
            .generate(&parsed, &output_dir, selection.effective)
            .await?;
        if let Some(warning) = selection.warning {
            generation.warnings.insert(0, warning);
        }

        let validation = self.validator.validate(&output_dir).await;
        for warning in &validation.warnings {
            warn!("{}: {}", parsed.metadata.id, warning);
        }

        let report = self
            .reporter
            .generate_report(&parsed, &generation, &validation, started.elapsed());

        info!(
            "Migrated capsule {} ({} mode): {} with quality {:.1}",
            report.capsule_id(),
            report.mode,
            report.status,
            report.quality_score()
        );
        Ok(report)
    }
}
