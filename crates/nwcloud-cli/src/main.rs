//! nwcloud CLI
//!
//! Toggles cloud deployment and JPA data-source configuration of a Maven
//! web project, keeping a backup of every file it edits.

use clap::{Parser, Subcommand};
use nwcloud_core::logging_facility::{init, Profile};
use nwcloud_engine::{ToggleAction, ToggleContext};
use nwcloud_store::config::LogFormat;
use nwcloud_store::NwcloudConfig;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "nwcloud")]
#[command(about = "nwcloud - Cloud platform configuration for Maven web projects", long_about = None)]
struct Cli {
    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Configuration file (default: <project>/nwcloud.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format: pretty or json
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prepare the application for deployment to the cloud platform
    EnableDeploy,
    /// Revert enable-deploy
    DisableDeploy,
    /// Configure JPA persistence to use the platform persistence service
    EnableJpa,
    /// Revert enable-jpa
    DisableJpa,
    /// Show per-capability state and which commands are available
    Status(commands::status::StatusArgs),
    /// List the commands currently available
    Commands,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = NwcloudConfig::resolve(&cli.project, cli.config.as_deref())?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    init(match config.logging.format {
        LogFormat::Json => Profile::Production,
        LogFormat::Pretty => Profile::Development,
    });

    let ctx = ToggleContext::for_project(&cli.project, &config);

    match cli.command {
        Commands::EnableDeploy => commands::toggle::execute(ToggleAction::EnableDeploy, &ctx),
        Commands::DisableDeploy => commands::toggle::execute(ToggleAction::DisableDeploy, &ctx),
        Commands::EnableJpa => commands::toggle::execute(ToggleAction::EnableJpa, &ctx),
        Commands::DisableJpa => commands::toggle::execute(ToggleAction::DisableJpa, &ctx),
        Commands::Status(args) => commands::status::execute(args, &ctx),
        Commands::Commands => commands::status::execute_list(&ctx),
    }
}
