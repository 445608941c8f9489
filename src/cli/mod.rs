//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("capsule-migrate")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Migrate TypeScript capsules into the eight-file service architecture")
            .subcommand_negates_reqs(true)
            .subcommand(commands::init::command())
            .subcommand(commands::analyze::command())
            .subcommand(commands::migrate::command())
            .subcommand(commands::batch::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("init", sub_matches)) => commands::init::run(sub_matches).await,
            Some(("analyze", sub_matches)) => commands::analyze::run(sub_matches).await,
            Some(("migrate", sub_matches)) => commands::migrate::run(sub_matches).await,
            Some(("batch", sub_matches)) => commands::batch::run(sub_matches).await,
            _ => {
                // No subcommand provided, show help
                let _ = Self::app().print_help();
                Ok(())
            }
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::{anyhow, Result};
    use capsule_parser::MigrationMode;
    use clap::{Arg, ArgAction, ArgMatches};
    use std::path::PathBuf;
    use tracing::{debug, info};

    use crate::Config;

    /// Config files looked up in the working directory
    pub const DEFAULT_CONFIG_FILES: [&str; 3] = [
        ".capsule-migrate.yaml",
        ".capsule-migrate.yml",
        "capsule-migrate.yaml",
    ];

    pub fn config_arg() -> Arg {
        Arg::new("config")
            .short('c')
            .long("config")
            .help("Configuration file path")
            .value_name("FILE")
    }

    pub fn mode_arg() -> Arg {
        Arg::new("mode")
            .short('m')
            .long("mode")
            .help("Migration mode")
            .value_name("MODE")
            .value_parser(["auto", "semi", "manual"])
    }

    pub fn no_format_arg() -> Arg {
        Arg::new("no-format")
            .long("no-format")
            .help("Skip the formatting pass")
            .action(ArgAction::SetTrue)
    }

    /// Get configuration file path from arguments or the default locations
    pub fn get_config_path(matches: &ArgMatches) -> Result<Option<PathBuf>> {
        if let Some(config_path) = matches.get_one::<String>("config") {
            let path = PathBuf::from(config_path);
            if !path.is_file() {
                return Err(anyhow!("Configuration file not found: {:?}", path));
            }
            return Ok(Some(path));
        }

        for name in DEFAULT_CONFIG_FILES {
            let path = PathBuf::from(name);
            if path.is_file() {
                return Ok(Some(path));
            }
        }

        let user_config = crate::utils::get_config_dir()
            .map(|dir| dir.join("config.yaml"))
            .ok()
            .filter(|path| path.is_file());
        Ok(user_config)
    }

    /// Load configuration, falling back to built-in defaults
    pub fn load_config(matches: &ArgMatches) -> Result<Config> {
        match get_config_path(matches)? {
            Some(path) => {
                info!("Using configuration file {:?}", path);
                Config::from_file(&path)
            }
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Apply the flags shared by `migrate` and `batch`
    pub fn apply_overrides(config: &mut Config, matches: &ArgMatches) -> Result<()> {
        if let Some(mode) = matches.get_one::<String>("mode") {
            config.generation.mode = mode.parse::<MigrationMode>().map_err(|e| anyhow!(e))?;
        }
        if matches.get_flag("no-format") {
            config.generation.format = false;
        }
        Ok(())
    }
}
