//! Saving reports under `<output root>/reports/`

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ReportError, ReportResult};
use crate::markdown::{render_batch_report, render_report};
use crate::types::{BatchMigrationReport, MigrationReport};

pub const REPORTS_DIR: &str = "reports";
pub const BATCH_REPORT_STEM: &str = "batch-migration-report";

pub struct ReportWriter {
    reports_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_root: &Path) -> Self {
        Self {
            reports_dir: output_root.join(REPORTS_DIR),
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Write `<id>-migration-report.md` and `.json`
    pub async fn save_report(&self, report: &MigrationReport) -> ReportResult<Vec<PathBuf>> {
        self.ensure_dir().await?;
        let stem = format!("{}-migration-report", report.capsule_id());
        let markdown = self.write(&format!("{stem}.md"), render_report(report)).await?;
        let json = self
            .write(&format!("{stem}.json"), to_json(report, report.capsule_id())?)
            .await?;
        debug!("Saved report for {} to {:?}", report.capsule_id(), self.reports_dir);
        Ok(vec![markdown, json])
    }

    /// Write the batch report and every per-capsule report it holds
    pub async fn save_batch_report(&self, batch: &BatchMigrationReport) -> ReportResult<Vec<PathBuf>> {
        self.ensure_dir().await?;
        let mut written = Vec::new();
        for report in &batch.reports {
            written.extend(self.save_report(report).await?);
        }
        written.push(
            self.write(&format!("{BATCH_REPORT_STEM}.md"), render_batch_report(batch))
                .await?,
        );
        written.push(
            self.write(&format!("{BATCH_REPORT_STEM}.json"), to_json(batch, "batch")?)
                .await?,
        );
        info!("Saved {} report files to {:?}", written.len(), self.reports_dir);
        Ok(written)
    }

    async fn ensure_dir(&self) -> ReportResult<()> {
        tokio::fs::create_dir_all(&self.reports_dir)
            .await
            .map_err(|source| ReportError::Io {
                path: self.reports_dir.clone(),
                source,
            })
    }

    async fn write(&self, file_name: &str, content: String) -> ReportResult<PathBuf> {
        let path = self.reports_dir.join(file_name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

fn to_json<T: Serialize>(value: &T, context: &str) -> ReportResult<String> {
    serde_json::to_string_pretty(value).map_err(|source| ReportError::Serialization {
        context: context.to_string(),
        source,
    })
}
