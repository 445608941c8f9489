//! Markdown rendering of reports

use crate::types::{BatchMigrationReport, MigrationReport, MigrationStatus};

pub fn render_report(report: &MigrationReport) -> String {
    let metadata = &report.metadata;
    let validation = &report.validation;

    let mut content = String::new();
    content.push_str(&format!("# Migration Report: {}\n\n", metadata.name));

    content.push_str("## Summary\n\n");
    content.push_str("| Field | Value |\n");
    content.push_str("|-------|-------|\n");
    content.push_str(&format!("| Capsule ID | `{}` |\n", metadata.id));
    content.push_str(&format!("| Version | {} |\n", metadata.version));
    content.push_str(&format!("| Category | {} |\n", metadata.category));
    content.push_str(&format!("| Status | {} |\n", status_badge(report.status)));
    content.push_str(&format!("| Mode | {} |\n", report.mode));
    content.push_str(&format!("| Time taken | {:.3}h |\n", report.time_taken));
    content.push_str(&format!("| Quality score | {:.1}/100 |\n", validation.quality_score));
    content.push_str(&format!("| Output | `{}` |\n", report.output_dir.display()));
    content.push_str(&format!(
        "| Generated | {} |\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    content.push_str("## Code Size\n\n");
    content.push_str("| | Files | Lines |\n");
    content.push_str("|---|---|---|\n");
    content.push_str(&format!("| Before | {} | {} |\n", report.before.files, report.before.lines));
    content.push_str(&format!("| After | {} | {} |\n\n", report.after.files, report.after.lines));

    content.push_str("## Complexity\n\n");
    content.push_str(&format!(
        "- Cyclomatic complexity: {}\n",
        report.complexity.cyclomatic_complexity
    ));
    content.push_str(&format!(
        "- Maintainability index: {:.1}\n",
        report.complexity.maintainability_index
    ));
    content.push_str(&format!(
        "- Estimated migration effort: {:.1}h\n\n",
        report.complexity.estimated_migration_hours
    ));

    content.push_str("## Validation\n\n");
    for check in &validation.checks {
        let mark = if check.passed { "x" } else { " " };
        content.push_str(&format!("- [{mark}] `{}`: {}\n", check.name, check.message));
    }
    content.push('\n');
    push_list(&mut content, "### Errors", &validation.errors);
    push_list(&mut content, "### Warnings", &validation.warnings);
    push_list(&mut content, "### Generation Errors", &report.generation_errors);
    push_list(&mut content, "### Generation Warnings", &report.generation_warnings);

    content.push_str("## Manual Actions\n\n");
    if report.manual_actions.is_empty() {
        content.push_str("None.\n");
    } else {
        for action in &report.manual_actions {
            content.push_str(&format!("- [ ] {action}\n"));
        }
    }

    content
}

pub fn render_batch_report(batch: &BatchMigrationReport) -> String {
    let mut content = String::new();
    content.push_str("# Batch Migration Report\n\n");
    content.push_str(&format!(
        "Generated {}\n\n",
        batch.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    content.push_str("## Summary\n\n");
    content.push_str(&format!("- Total capsules: {}\n", batch.total_capsules));
    content.push_str(&format!("- Successful: {}\n", batch.successful_migrations));
    content.push_str(&format!("- Failed: {}\n", batch.failed_migrations));
    content.push_str(&format!(
        "- Complete / in progress: {} / {}\n",
        batch.count_with_status(MigrationStatus::Complete),
        batch.count_with_status(MigrationStatus::InProgress)
    ));
    content.push_str(&format!("- Total time: {:.3}h\n", batch.total_time_taken));
    content.push_str(&format!("- Average quality score: {:.1}\n", batch.avg_quality_score));
    content.push_str(&format!(
        "- Lines: {} before, {} after\n\n",
        batch.total_lines_before, batch.total_lines_after
    ));

    content.push_str("## Capsules\n\n");
    if batch.reports.is_empty() {
        content.push_str("No capsules produced a report.\n");
        return content;
    }
    content.push_str("| Capsule | Status | Mode | Quality | Lines (before → after) | Time |\n");
    content.push_str("|---------|--------|------|---------|------------------------|------|\n");
    for report in &batch.reports {
        content.push_str(&format!(
            "| `{}` | {} | {} | {:.1} | {} → {} | {:.3}h |\n",
            report.capsule_id(),
            status_badge(report.status),
            report.mode,
            report.quality_score(),
            report.before.lines,
            report.after.lines,
            report.time_taken
        ));
    }

    let unreported = batch.total_capsules.saturating_sub(batch.reports.len());
    if unreported > 0 {
        content.push_str(&format!(
            "\n{unreported} capsule(s) failed before a report could be produced.\n"
        ));
    }

    content
}

fn status_badge(status: MigrationStatus) -> &'static str {
    match status {
        MigrationStatus::Pending => "⏳ pending",
        MigrationStatus::InProgress => "🔧 in progress",
        MigrationStatus::Complete => "✅ complete",
        MigrationStatus::Failed => "❌ failed",
    }
}

fn push_list(content: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    content.push_str(&format!("{heading}\n\n"));
    for item in items {
        content.push_str(&format!("- {item}\n"));
    }
    content.push('\n');
}
