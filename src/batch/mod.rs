//! Batch orchestration
//!
//! Capsules run in consecutive groups of `parallel`. Every member of a group
//! is started together and the group is joined before the next one starts.
//! Reports are collected in input order whatever order the members finish in.
//! Capsule ids are resolved up front; a capsule whose id an earlier capsule
//! already claimed fails instead of overwriting that capsule's output.

use capsule_parser::MigrationMode;
use capsule_report::{BatchMigrationReport, ReportWriter};
use futures::future::join_all;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{MigrationError, MigrationResult};
use crate::migrator::CapsuleMigrator;

/// One batch run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub capsules: Vec<PathBuf>,
    pub output_root: PathBuf,
    pub parallel: usize,
    pub mode: MigrationMode,
    pub stop_on_error: bool,
    pub save_reports: bool,
}

impl BatchConfig {
    pub fn new(capsules: Vec<PathBuf>, output_root: PathBuf) -> Self {
        Self {
            capsules,
            output_root,
            parallel: crate::config::batch::DEFAULT_PARALLEL,
            mode: MigrationMode::Auto,
            stop_on_error: false,
            save_reports: true,
        }
    }

    /// Batch settings from configuration
    pub fn from_config(config: &Config, capsules: Vec<PathBuf>, output_root: PathBuf) -> Self {
        Self {
            capsules,
            output_root,
            parallel: config.batch.parallel,
            mode: config.generation.mode,
            stop_on_error: config.batch.stop_on_error,
            save_reports: config.batch.save_reports,
        }
    }
}

pub struct BatchOrchestrator {
    migrator: CapsuleMigrator,
}

impl BatchOrchestrator {
    pub fn new(migrator: CapsuleMigrator) -> Self {
        Self { migrator }
    }

    pub fn migrator(&self) -> &CapsuleMigrator {
        &self.migrator
    }

    pub async fn run(&self, config: &BatchConfig) -> MigrationResult<BatchMigrationReport> {
        if config.parallel == 0 {
            return Err(MigrationError::Config(
                "batch parallelism must be at least 1".to_string(),
            ));
        }

        let total = config.capsules.len();
        info!(
            "Starting batch of {} capsules ({} at a time, {} mode)",
            total, config.parallel, config.mode
        );

        let claims = self.earlier_claims(&config.capsules).await;
        let mut reports = Vec::with_capacity(total);
        let mut processed = 0;

        for (index, group) in config.capsules.chunks(config.parallel).enumerate() {
            info!("Group {}: {} capsules", index + 1, group.len());

            let group_claims = &claims[index * config.parallel..];
            let outcomes = join_all(group.iter().zip(group_claims).map(|(input, claim)| async move {
                if let Some((id, first)) = claim {
                    return Err(MigrationError::DuplicateCapsule {
                        id: id.clone(),
                        first: first.clone(),
                    });
                }
                self.migrator
                    .migrate_capsule(input, &config.output_root, config.mode)
                    .await
            }))
            .await;

            let mut abort = None;
            for (input, outcome) in group.iter().zip(outcomes) {
                processed += 1;
                match outcome {
                    Ok(report) => reports.push(report),
                    Err(e) => {
                        let capsule = capsule_label(input);
                        error!("Capsule {} failed: [{}] {}", capsule, e.code(), e);
                        eprintln!("✗ {capsule}: [{}] {e}", e.code());
                        if config.stop_on_error && abort.is_none() {
                            abort = Some((capsule, e));
                        }
                    }
                }
            }

            let dashboard = self
                .migrator
                .reporter()
                .generate_progress_dashboard(total, processed, &reports);
            info!("{}", dashboard);
            println!("{dashboard}");

            if let Some((capsule, source)) = abort {
                return Err(MigrationError::Orchestration {
                    capsule,
                    source: Box::new(source),
                });
            }
        }

        let batch = self.migrator.reporter().generate_batch_report(reports, total);
        info!(
            "Batch finished: {} succeeded, {} failed, average quality {:.1}",
            batch.successful_migrations, batch.failed_migrations, batch.avg_quality_score
        );

        if config.save_reports {
            ReportWriter::new(&config.output_root)
                .save_batch_report(&batch)
                .await?;
        }

        Ok(batch)
    }

    /// For each capsule, the id it shares with an earlier capsule and that
    /// capsule's path
    ///
    /// Ids that cannot be resolved are left for the migration itself to report.
    async fn earlier_claims(&self, capsules: &[PathBuf]) -> Vec<Option<(String, PathBuf)>> {
        let parser = self.migrator.parser();
        let ids = join_all(capsules.iter().map(|input| parser.resolve_id(input))).await;

        let mut owners: HashMap<String, &PathBuf> = HashMap::new();
        capsules
            .iter()
            .zip(ids)
            .map(|(input, id)| {
                let id = id.ok()?;
                match owners.entry(id) {
                    Entry::Occupied(owner) => {
                        warn!(
                            "Capsule {:?} resolves to id {} already used by {:?}",
                            input,
                            owner.key(),
                            owner.get()
                        );
                        Some((owner.key().clone(), owner.get().to_path_buf()))
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(input);
                        None
                    }
                }
            })
            .collect()
    }
}

fn capsule_label(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}
