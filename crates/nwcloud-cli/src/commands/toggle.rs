//! Toggle commands
//!
//! Usage: nwcloud enable-deploy | disable-deploy | enable-jpa | disable-jpa

use nwcloud_engine::{CommandRegistry, ToggleAction, ToggleContext};

/// Execute one toggle through the dispatcher
pub fn execute(action: ToggleAction, ctx: &ToggleContext) -> Result<(), Box<dyn std::error::Error>> {
    let report = CommandRegistry::new(ctx).dispatch(action.name())?;

    for change in &report.changes {
        println!("  {}", change);
    }
    println!("✓ {} completed", report.command);

    Ok(())
}
