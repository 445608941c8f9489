//! Migrate command implementation

use crate::cli::utils;
use crate::{CapsuleMigrator, MigrationReport};
use anyhow::{anyhow, Result};
use capsule_report::ReportWriter;
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("migrate")
        .about("Migrate a single capsule")
        .arg(
            clap::Arg::new("input")
                .help("Capsule directory")
                .value_name("DIR")
                .required(true),
        )
        .arg(
            clap::Arg::new("output")
                .help("Output root; the capsule is written to <output>/<capsule id>")
                .value_name("DIR"),
        )
        .arg(utils::mode_arg())
        .arg(utils::no_format_arg())
        .arg(
            clap::Arg::new("no-report")
                .long("no-report")
                .help("Don't save the migration report")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Missing capsule directory"))?;

    let mut config = utils::load_config(matches)?;
    utils::apply_overrides(&mut config, matches)?;
    if let Some(output) = matches.get_one::<String>("output") {
        config.output.base_path = PathBuf::from(output);
    }
    config.validate()?;

    info!(
        "Migrating {:?} into {:?} ({} mode)",
        input, config.output.base_path, config.generation.mode
    );

    let migrator = CapsuleMigrator::from_config(&config);
    let report = migrator
        .migrate_capsule(&input, &config.output.base_path, config.generation.mode)
        .await?;

    print_report(&report);

    if !matches.get_flag("no-report") {
        let written = ReportWriter::new(&config.output.base_path)
            .save_report(&report)
            .await?;
        for path in written {
            println!("Report: {}", path.display());
        }
    }

    if report.status.is_failed() {
        return Err(anyhow!("Migration of {} failed", report.capsule_id()));
    }
    Ok(())
}

fn print_report(report: &MigrationReport) {
    println!(
        "{} {} -> {}",
        report.status,
        report.capsule_id(),
        report.output_dir.display()
    );
    println!("Mode: {}", report.mode);
    println!(
        "Lines: {} in {} files -> {} in {} files",
        report.before.lines, report.before.files, report.after.lines, report.after.files
    );
    println!(
        "Quality score: {:.1} ({}/{} checks passed)",
        report.quality_score(),
        report.validation.passed_checks(),
        report.validation.checks.len()
    );
    println!("Time: {}", crate::utils::format_hours(report.time_taken));

    for error in report.generation_errors.iter().chain(&report.validation.errors) {
        eprintln!("  Error: {error}");
    }
    for warning in report
        .generation_warnings
        .iter()
        .chain(&report.validation.warnings)
    {
        println!("  Warning: {warning}");
    }
    if !report.manual_actions.is_empty() {
        println!("Manual actions:");
        for action in &report.manual_actions {
            println!("  - {action}");
        }
    }
}
