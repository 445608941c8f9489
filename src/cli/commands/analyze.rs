//! Analyze command implementation

use crate::cli::utils;
use crate::CapsuleMigrator;
use anyhow::{anyhow, Result};
use capsule_parser::{recommend_mode, ParsedCapsule};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("analyze")
        .about("Parse a capsule and report its structure and complexity")
        .arg(
            clap::Arg::new("input")
                .help("Capsule directory")
                .value_name("DIR")
                .required(true),
        )
        .arg(
            clap::Arg::new("json")
                .long("json")
                .help("Print the full analysis as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Missing capsule directory"))?;
    info!("Analyzing capsule at {:?}", input);

    let config = utils::load_config(matches)?;
    let parsed = CapsuleMigrator::from_config(&config).analyze(&input).await?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else {
        print_summary(&parsed);
    }

    Ok(())
}

fn print_summary(parsed: &ParsedCapsule) {
    let metadata = &parsed.metadata;
    let analysis = &parsed.analysis;
    let complexity = &parsed.complexity;

    println!("{} ({}) v{}", metadata.name, metadata.id, metadata.version);
    println!("Category: {}", metadata.category);
    println!(
        "Platforms: {}",
        metadata
            .platforms
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if !metadata.dependencies.is_empty() {
        println!("Dependencies: {}", metadata.dependencies.join(", "));
    }

    println!("\nDeclarations:");
    println!("  Types: {}", analysis.types.len());
    println!("  Interfaces: {}", analysis.interfaces.len());
    println!("  Classes: {}", analysis.classes.len());
    println!("  Functions: {}", analysis.functions.len());
    println!("  Constants: {}", analysis.constants.len());
    println!("  Error classes: {}", analysis.errors.len());
    println!("  Imports: {}", analysis.imports.len());
    println!("  Exports: {}", analysis.exports.len());

    println!("\nComplexity:");
    println!("  Files: {}", parsed.source_files.len());
    println!("  Lines of code: {}", complexity.lines_of_code);
    println!("  Cyclomatic complexity: {}", complexity.cyclomatic_complexity);
    println!("  Maintainability index: {:.1}", complexity.maintainability_index);
    println!(
        "  Estimated migration effort: {:.1}h",
        complexity.estimated_migration_hours
    );
    for file in &complexity.files {
        println!(
            "    {} ({} lines, complexity {})",
            file.path.display(),
            file.lines_of_code,
            file.cyclomatic_complexity
        );
    }

    println!("\nRecommended mode: {}", recommend_mode(complexity));
}
