//! Report types

use capsule_parser::{CapsuleMetadata, ComplexityMetrics, MigrationMode};
use capsule_validator::ValidationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStatus {
    Pending,
    InProgress,
    Complete,
    Failed,
}

impl MigrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationStatus::Pending => "pending",
            MigrationStatus::InProgress => "in_progress",
            MigrationStatus::Complete => "complete",
            MigrationStatus::Failed => "failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, MigrationStatus::Failed)
    }
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File and line totals on one side of a migration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSize {
    pub files: usize,
    pub lines: usize,
}

/// Outcome of migrating one capsule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub metadata: CapsuleMetadata,
    pub status: MigrationStatus,
    pub mode: MigrationMode,
    /// Wall-clock hours spent on the capsule
    pub time_taken: f64,
    pub before: CodeSize,
    pub after: CodeSize,
    pub complexity: ComplexityMetrics,
    pub validation: ValidationResult,
    pub generation_errors: Vec<String>,
    pub generation_warnings: Vec<String>,
    pub manual_actions: Vec<String>,
    pub output_dir: PathBuf,
    pub generated_at: DateTime<Utc>,
}

impl MigrationReport {
    pub fn capsule_id(&self) -> &str {
        &self.metadata.id
    }

    pub fn quality_score(&self) -> f64 {
        self.validation.quality_score
    }
}

/// Totals over a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMigrationReport {
    pub total_capsules: usize,
    /// Reports whose status is not failed
    pub successful_migrations: usize,
    /// Failed reports plus capsules that never produced a report
    pub failed_migrations: usize,
    /// Hours, summed over every report
    pub total_time_taken: f64,
    /// Mean over every report, failed ones included
    pub avg_quality_score: f64,
    pub total_lines_before: usize,
    pub total_lines_after: usize,
    pub reports: Vec<MigrationReport>,
    pub generated_at: DateTime<Utc>,
}

impl BatchMigrationReport {
    pub fn has_failures(&self) -> bool {
        self.failed_migrations > 0
    }

    pub fn count_with_status(&self, status: MigrationStatus) -> usize {
        self.reports.iter().filter(|r| r.status == status).count()
    }
}

/// Point-in-time batch progress, derived from `(total, processed, reports)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressDashboard {
    pub total_capsules: usize,
    pub processed_capsules: usize,
    pub successful: usize,
    pub failed: usize,
    pub percent_complete: f64,
    /// Hours
    pub average_time_per_capsule: f64,
    /// Hours
    pub estimated_time_remaining: f64,
}

impl fmt::Display for ProgressDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Progress: {}/{} ({:.1}%) | {} ok, {} failed | avg {:.3}h/capsule | ~{:.3}h remaining",
            self.processed_capsules,
            self.total_capsules,
            self.percent_complete,
            self.successful,
            self.failed,
            self.average_time_per_capsule,
            self.estimated_time_remaining
        )
    }
}
