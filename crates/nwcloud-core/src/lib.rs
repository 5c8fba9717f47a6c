//! nwcloud Core - toggle engine building blocks
//!
//! This crate provides everything the enable/disable commands are composed of:
//! - A lossless XML tree with path queries and idempotent structural edits
//! - Per-file backups whose presence encodes the toggle state
//! - Availability predicates derived purely from file and backup presence
//! - Collaborator traits for the filesystem, project layout and templates
//! - The structured error and logging facilities

pub mod backup;
pub mod errors;
pub mod gate;
pub mod logging_facility;
pub mod memory_store;
pub mod plugin;
pub mod ports;
pub mod targets;
pub mod xml;

pub use nwcloud_core_types::schema;

// Re-export commonly used types
pub use backup::{backup_path, BackupOutcome, BackupStore, ExistingBackupPolicy, BACKUP_SUFFIX};
pub use errors::{ExError, ExErrorKind, Result};
pub use gate::{can_disable, can_enable, compute_state};
pub use memory_store::MemoryFileStore;
pub use plugin::PluginDescriptor;
pub use ports::{FileStore, ProjectArea, ProjectLocator, TemplateProvider};
pub use targets::{capability_files, CapabilityFiles, DeployTargets, JpaTargets};
pub use xml::{XmlDocument, XmlElement, XmlNode, XmlPath};
