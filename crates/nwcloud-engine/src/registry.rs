//! Command registry and dispatcher
//!
//! Owns the lifecycle bracket of every command run: a start event, then an
//! end or end_error event with the elapsed time. Commands themselves only log
//! warnings and per-file changes.

use crate::commands::{ToggleAction, ToggleCommand, ToggleReport};
use crate::context::ToggleContext;
use nwcloud_core::errors::{command_unavailable, unknown_command, Result};
use nwcloud_core::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// The four commands bound to one context
pub struct CommandRegistry<'a> {
    commands: Vec<Box<dyn ToggleCommand + 'a>>,
}

impl<'a> CommandRegistry<'a> {
    pub fn new(ctx: &'a ToggleContext) -> Self {
        Self {
            commands: ToggleAction::ALL
                .iter()
                .map(|action| action.command(ctx))
                .collect(),
        }
    }

    /// Every registered command
    pub fn commands(&self) -> Vec<&dyn ToggleCommand> {
        self.commands
            .iter()
            .map(|c| c.as_ref() as &dyn ToggleCommand)
            .collect()
    }

    /// Commands whose availability predicate currently holds
    pub fn available(&self) -> Vec<&dyn ToggleCommand> {
        self.commands()
            .into_iter()
            .filter(|c| c.is_available())
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<&dyn ToggleCommand> {
        self.commands().into_iter().find(|c| c.name() == name)
    }

    /// Run the named command if it is available
    ///
    /// # Errors
    ///
    /// `UnknownCommand`, `CommandUnavailable`, or the command's own error.
    pub fn dispatch(&self, name: &str) -> Result<ToggleReport> {
        let command = self.find(name).ok_or_else(|| unknown_command(name))?;
        if !command.is_available() {
            let err = command_unavailable(name);
            log_op_error!(name, err, duration_ms = 0u64);
            return Err(err);
        }

        log_op_start!(
            name,
            capability = command.capability().as_str(),
            direction = command.direction().as_str()
        );
        let start = Instant::now();
        match command.run() {
            Ok(report) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                log_op_end!(name, duration_ms = duration_ms, changes = report.changes.len());
                Ok(report)
            }
            Err(err) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                log_op_error!(name, err, duration_ms = duration_ms);
                Err(err)
            }
        }
    }
}
