//! Per-capability status report

use crate::commands::ToggleAction;
use crate::context::ToggleContext;
use nwcloud_core::{backup_path, CapabilityFiles};
use nwcloud_core_types::{Capability, Direction, ToggleState};
use serde::Serialize;
use std::path::PathBuf;

/// Presence of one backup file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupStatus {
    pub file: PathBuf,
    pub backup: PathBuf,
    pub present: bool,
}

/// State of one capability and which half of its pair may run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityStatus {
    pub capability: Capability,
    pub state: ToggleState,
    pub can_enable: bool,
    pub can_disable: bool,
    pub backups: Vec<BackupStatus>,
}

impl CapabilityStatus {
    /// Name of the command the user can run next, if any
    pub fn next_command(&self) -> Option<&'static str> {
        let direction = if self.can_enable {
            Direction::Enable
        } else if self.can_disable {
            Direction::Disable
        } else {
            return None;
        };
        ToggleAction::ALL
            .into_iter()
            .find(|a| a.capability() == self.capability && a.direction() == direction)
            .map(|a| a.name())
    }
}

/// Status of every capability, derived fresh from the project files
///
/// The build descriptor is resolved once for the whole report.
pub fn status_report(ctx: &ToggleContext) -> Vec<CapabilityStatus> {
    let (locator, files) = (ctx.locator(), ctx.files());
    let descriptor = locator.primary_descriptor_path();
    Capability::ALL
        .into_iter()
        .map(|capability| {
            let Some(set) = descriptor
                .as_deref()
                .map(|d| CapabilityFiles::for_descriptor(capability, locator, d))
            else {
                return CapabilityStatus {
                    capability,
                    state: ToggleState::Disabled,
                    can_enable: false,
                    can_disable: false,
                    backups: Vec::new(),
                };
            };
            let backups = set
                .backed_up
                .iter()
                .map(|file| {
                    let backup = backup_path(file);
                    let present = files.exists(&backup);
                    BackupStatus {
                        file: file.clone(),
                        backup,
                        present,
                    }
                })
                .collect();
            CapabilityStatus {
                capability,
                state: set.state(files),
                can_enable: set.can_enable(files),
                can_disable: set.can_disable(files),
                backups,
            }
        })
        .collect()
}
