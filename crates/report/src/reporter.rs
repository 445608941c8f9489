//! Report aggregation
//!
//! Everything here is a pure function of its inputs apart from the report
//! timestamp, which can be pinned with [`Reporter::with_timestamp`].

use capsule_generator::GenerationResult;
use capsule_parser::{MigrationMode, ParsedCapsule};
use capsule_validator::ValidationResult;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::types::{BatchMigrationReport, CodeSize, MigrationReport, MigrationStatus, ProgressDashboard};

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Default)]
pub struct Reporter {
    timestamp: Option<DateTime<Utc>>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.timestamp.unwrap_or_else(Utc::now)
    }

    /// Join one parse/generate/validate triple into a report
    pub fn generate_report(
        &self,
        parsed: &ParsedCapsule,
        generation: &GenerationResult,
        validation: &ValidationResult,
        elapsed: Duration,
    ) -> MigrationReport {
        MigrationReport {
            metadata: parsed.metadata.clone(),
            status: migration_status(generation, validation),
            mode: generation.mode,
            time_taken: elapsed.as_secs_f64() / SECONDS_PER_HOUR,
            before: CodeSize {
                files: parsed.source_files.len(),
                lines: parsed.complexity.lines_of_code,
            },
            after: CodeSize {
                files: generation.files.len(),
                lines: generation.total_lines(),
            },
            complexity: parsed.complexity.clone(),
            validation: validation.clone(),
            generation_errors: generation.errors.clone(),
            generation_warnings: generation.warnings.clone(),
            manual_actions: generation.manual_actions.clone(),
            output_dir: generation.output_dir.clone(),
            generated_at: self.now(),
        }
    }

    /// Reduce reports into batch totals
    ///
    /// `total_capsules` counts every capsule the batch attempted, including
    /// those that failed before a report existed.
    pub fn generate_batch_report(
        &self,
        reports: Vec<MigrationReport>,
        total_capsules: usize,
    ) -> BatchMigrationReport {
        let successful_migrations = reports.iter().filter(|r| !r.status.is_failed()).count();
        let failed_reports = reports.len() - successful_migrations;
        let unreported = total_capsules.saturating_sub(reports.len());

        BatchMigrationReport {
            total_capsules,
            successful_migrations,
            failed_migrations: failed_reports + unreported,
            total_time_taken: reports.iter().map(|r| r.time_taken).sum(),
            avg_quality_score: mean(reports.iter().map(|r| r.quality_score())),
            total_lines_before: reports.iter().map(|r| r.before.lines).sum(),
            total_lines_after: reports.iter().map(|r| r.after.lines).sum(),
            reports,
            generated_at: self.now(),
        }
    }

    /// Progress snapshot for a batch in flight
    pub fn generate_progress_dashboard(
        &self,
        total_capsules: usize,
        processed_capsules: usize,
        reports: &[MigrationReport],
    ) -> ProgressDashboard {
        progress_dashboard(total_capsules, processed_capsules, reports)
    }
}

/// Failed on any generation error or invalid validation; in progress while a
/// non-auto migration still has manual actions; complete otherwise
pub fn migration_status(generation: &GenerationResult, validation: &ValidationResult) -> MigrationStatus {
    if !generation.errors.is_empty() || !validation.is_valid {
        MigrationStatus::Failed
    } else if generation.mode != MigrationMode::Auto && !generation.manual_actions.is_empty() {
        MigrationStatus::InProgress
    } else {
        MigrationStatus::Complete
    }
}

pub fn progress_dashboard(
    total_capsules: usize,
    processed_capsules: usize,
    reports: &[MigrationReport],
) -> ProgressDashboard {
    let successful = reports.iter().filter(|r| !r.status.is_failed()).count();
    let percent_complete = if total_capsules == 0 {
        100.0
    } else {
        (processed_capsules as f64 / total_capsules as f64 * 100.0).min(100.0)
    };
    let average_time_per_capsule = mean(reports.iter().map(|r| r.time_taken));
    let remaining = total_capsules.saturating_sub(processed_capsules);

    ProgressDashboard {
        total_capsules,
        processed_capsules,
        successful,
        failed: processed_capsules.saturating_sub(successful),
        percent_complete,
        average_time_per_capsule,
        estimated_time_remaining: average_time_per_capsule * remaining as f64,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
