//! nwcloud Store - filesystem side of the toggle engine
//!
//! Provides:
//! - `FsFileStore`, a `FileStore` with atomic temp→rename writes
//! - `MavenProjectLocator`, which finds the build descriptor and the
//!   conventional Maven source directories
//! - Bundled templates, optionally overlaid by a directory
//! - TOML configuration with environment overrides

pub mod config;
pub mod errors;
pub mod fs;
pub mod locator;
pub mod templates;

// Re-export key types
pub use config::{ConfigError, NwcloudConfig};
pub use errors::Result;
pub use fs::FsFileStore;
pub use locator::MavenProjectLocator;
pub use templates::{BundledTemplates, DirectoryTemplates};
