//! Status and command listing
//!
//! Usage: nwcloud status [--json] | nwcloud commands

use clap::Args;
use nwcloud_engine::{status_report, CommandRegistry, ToggleContext};

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute status command
pub fn execute(args: StatusArgs, ctx: &ToggleContext) -> Result<(), Box<dyn std::error::Error>> {
    let report = status_report(ctx);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for status in &report {
        println!("{:<8} {}", status.capability.to_string(), status.state);
        for backup in &status.backups {
            let marker = if backup.present { "backup" } else { "-" };
            println!("    {:<7} {}", marker, backup.file.display());
        }
        if let Some(next) = status.next_command() {
            println!("    next: {}", next);
        }
    }

    Ok(())
}

/// Execute commands command: list what may run now
pub fn execute_list(ctx: &ToggleContext) -> Result<(), Box<dyn std::error::Error>> {
    let registry = CommandRegistry::new(ctx);
    let available = registry.available();

    if available.is_empty() {
        println!("No commands available in {}", ctx.locator().root().display());
    }
    for command in available {
        println!("{}", command.name());
    }

    Ok(())
}
