//! Batch command implementation

use crate::cli::utils;
use crate::{BatchConfig, BatchOrchestrator, CapsuleMigrator};
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("batch")
        .about("Migrate every capsule under a directory")
        .arg(
            clap::Arg::new("input")
                .help("Directory whose subdirectories are capsules")
                .value_name("DIR")
                .required(true),
        )
        .arg(
            clap::Arg::new("output")
                .help("Output root")
                .value_name("DIR"),
        )
        .arg(utils::mode_arg())
        .arg(
            clap::Arg::new("parallel")
                .short('p')
                .long("parallel")
                .help("Capsules migrated concurrently")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            clap::Arg::new("stop-on-error")
                .long("stop-on-error")
                .help("Abort after the first failing capsule")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("no-report")
                .long("no-report")
                .help("Don't save reports")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(utils::no_format_arg())
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Missing capsule root directory"))?;

    let mut config = utils::load_config(matches)?;
    utils::apply_overrides(&mut config, matches)?;
    if let Some(output) = matches.get_one::<String>("output") {
        config.output.base_path = PathBuf::from(output);
    }
    if let Some(parallel) = matches.get_one::<usize>("parallel") {
        config.batch.parallel = *parallel;
    }
    if matches.get_flag("stop-on-error") {
        config.batch.stop_on_error = true;
    }
    if matches.get_flag("no-report") {
        config.batch.save_reports = false;
    }
    config.validate()?;

    let migrator = CapsuleMigrator::from_config(&config);
    let capsules = crate::utils::discover_capsule_dirs(&input, migrator.parser())?;
    if capsules.is_empty() {
        return Err(anyhow!("No capsules found under {:?}", input));
    }
    info!("Found {} capsules under {:?}", capsules.len(), input);

    let batch_config = BatchConfig::from_config(&config, capsules, config.output.base_path.clone());
    let batch = BatchOrchestrator::new(migrator).run(&batch_config).await?;

    println!("\nBatch migration finished");
    println!("Capsules: {}", batch.total_capsules);
    println!("Successful: {}", batch.successful_migrations);
    println!("Failed: {}", batch.failed_migrations);
    println!("Average quality score: {:.1}", batch.avg_quality_score);
    println!("Total time: {}", crate::utils::format_hours(batch.total_time_taken));
    if batch_config.save_reports {
        println!(
            "Reports: {}",
            batch_config.output_root.join(capsule_report::writer::REPORTS_DIR).display()
        );
    }

    if batch.has_failures() {
        return Err(anyhow!(
            "{} of {} capsules failed",
            batch.failed_migrations,
            batch.total_capsules
        ));
    }
    Ok(())
}
