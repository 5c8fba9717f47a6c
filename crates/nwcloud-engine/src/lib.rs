//! nwcloud Engine - Orchestration layer
//!
//! Composes backups, availability predicates and XML edits into the four
//! toggle commands, and dispatches them by name.

pub mod commands;
pub mod context;
pub mod registry;
pub mod status;

pub use commands::{apply_toggle_action, ToggleAction, ToggleCommand, ToggleReport};
pub use context::ToggleContext;
pub use registry::CommandRegistry;
pub use status::{status_report, CapabilityStatus};
