//! Toggle commands
//!
//! Each capability has an enable/disable pair. Enable backs up every file it
//! is about to change, then edits; disable restores the backups. Commands do
//! not check their own availability: the registry does that before `run`.

pub mod deploy;
pub mod jpa;

use crate::context::ToggleContext;
use nwcloud_core::errors::{not_found, unknown_command, ExError, Result};
use nwcloud_core::gate::{can_disable, can_enable};
use nwcloud_core::ProjectArea;
use nwcloud_core_types::{Capability, Direction};
use std::fmt;
use std::str::FromStr;

pub use deploy::{DisableDeploy, EnableDeploy};
pub use jpa::{DisableJpa, EnableJpa};

/// What a command run changed, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleReport {
    pub command: &'static str,
    pub changes: Vec<String>,
}

impl ToggleReport {
    fn new(command: &'static str) -> Self {
        Self {
            command,
            changes: Vec::new(),
        }
    }

    fn record(&mut self, change: impl Into<String>) {
        let change = change.into();
        if !change.is_empty() {
            self.changes.push(change);
        }
    }
}

/// One half of a capability's enable/disable pair
pub trait ToggleCommand {
    /// Command name as typed by the user, e.g. `enable-deploy`
    fn name(&self) -> &'static str;

    fn capability(&self) -> Capability;

    fn direction(&self) -> Direction;

    /// Availability predicate, from file and backup presence only
    fn is_available(&self) -> bool;

    /// Perform the command
    ///
    /// # Errors
    ///
    /// The first fatal error; steps already committed stay committed.
    fn run(&self) -> Result<ToggleReport>;
}

/// Availability shared by every command: enable needs `can_enable`, disable
/// needs `can_disable`
fn gate(ctx: &ToggleContext, capability: Capability, direction: Direction) -> bool {
    match direction {
        Direction::Enable => can_enable(capability, ctx.locator(), ctx.files()),
        Direction::Disable => can_disable(capability, ctx.locator(), ctx.files()),
    }
}

/// Error for a project without a build descriptor
fn missing_descriptor(ctx: &ToggleContext, op: &str) -> ExError {
    not_found(
        op,
        &ctx.locator()
            .resolve(ProjectArea::Root, nwcloud_store::locator::BUILD_DESCRIPTOR),
    )
}

/// The four commands by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleAction {
    EnableDeploy,
    DisableDeploy,
    EnableJpa,
    DisableJpa,
}

impl ToggleAction {
    /// Every action, enable before disable per capability
    pub const ALL: [ToggleAction; 4] = [
        ToggleAction::EnableDeploy,
        ToggleAction::DisableDeploy,
        ToggleAction::EnableJpa,
        ToggleAction::DisableJpa,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToggleAction::EnableDeploy => "enable-deploy",
            ToggleAction::DisableDeploy => "disable-deploy",
            ToggleAction::EnableJpa => "enable-jpa",
            ToggleAction::DisableJpa => "disable-jpa",
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            ToggleAction::EnableDeploy | ToggleAction::DisableDeploy => Capability::Deploy,
            ToggleAction::EnableJpa | ToggleAction::DisableJpa => Capability::Jpa,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            ToggleAction::EnableDeploy | ToggleAction::EnableJpa => Direction::Enable,
            ToggleAction::DisableDeploy | ToggleAction::DisableJpa => Direction::Disable,
        }
    }

    /// One-line help text
    pub fn description(&self) -> &'static str {
        match self {
            ToggleAction::EnableDeploy => {
                "Prepare the application for deployment to the cloud platform"
            }
            ToggleAction::DisableDeploy => "Revert enable-deploy",
            ToggleAction::EnableJpa => {
                "Configure JPA persistence to use the platform persistence service"
            }
            ToggleAction::DisableJpa => "Revert enable-jpa",
        }
    }

    /// The command implementing this action, bound to `ctx`
    pub fn command<'a>(&self, ctx: &'a ToggleContext) -> Box<dyn ToggleCommand + 'a> {
        match self {
            ToggleAction::EnableDeploy => Box::new(EnableDeploy::new(ctx)),
            ToggleAction::DisableDeploy => Box::new(DisableDeploy::new(ctx)),
            ToggleAction::EnableJpa => Box::new(EnableJpa::new(ctx)),
            ToggleAction::DisableJpa => Box::new(DisableJpa::new(ctx)),
        }
    }
}

impl fmt::Display for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToggleAction {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self> {
        ToggleAction::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| unknown_command(s))
    }
}

/// Run `action` against `ctx` without consulting its availability predicate
///
/// # Errors
///
/// Whatever the command returns.
pub fn apply_toggle_action(action: ToggleAction, ctx: &ToggleContext) -> Result<ToggleReport> {
    action.command(ctx).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nwcloud_core::ExErrorKind;

    #[test]
    fn test_names_round_trip() {
        for action in ToggleAction::ALL {
            assert_eq!(action.name().parse::<ToggleAction>().unwrap(), action);
        }
        let err = "enable-ejb".parse::<ToggleAction>().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::UnknownCommand);
    }

    #[test]
    fn test_pairs_share_a_capability() {
        assert_eq!(ToggleAction::EnableJpa.capability(), ToggleAction::DisableJpa.capability());
        assert_eq!(ToggleAction::DisableDeploy.direction(), Direction::Disable);
    }

    #[test]
    fn test_report_skips_empty_changes() {
        let mut report = ToggleReport::new("enable-deploy");
        report.record("");
        report.record("Backup of pom.xml");
        assert_eq!(report.changes, vec!["Backup of pom.xml".to_string()]);
    }
}
