//! Template providers
//!
//! The canonical fragments are compiled into the binary. A directory named in
//! the configuration may override any of them file by file.

use crate::errors::fs_error;
use nwcloud_core::errors::{template_missing, ExErrorKind, Result};
use nwcloud_core::TemplateProvider;
use std::fs;
use std::path::PathBuf;

/// Build plugins added by enable-deploy
pub const CONFIGURATION_TEMPLATE: &str = "configuration.xml";
/// Settings file staged in the project root by enable-deploy
pub const DEPLOY_PROPERTIES_TEMPLATE: &str = "nwcloud.properties";
/// Persistence descriptor installed by enable-jpa
pub const PERSISTENCE_TEMPLATE: &str = "persistence.xml";

const BUNDLED: &[(&str, &[u8])] = &[
    (
        CONFIGURATION_TEMPLATE,
        include_bytes!("../templates/configuration.xml"),
    ),
    (
        DEPLOY_PROPERTIES_TEMPLATE,
        include_bytes!("../templates/nwcloud.properties"),
    ),
    (
        PERSISTENCE_TEMPLATE,
        include_bytes!("../templates/persistence.xml"),
    ),
];

/// Templates shipped inside the binary
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledTemplates;

impl BundledTemplates {
    pub fn new() -> Self {
        Self
    }

    /// Names of every bundled template
    pub fn names() -> impl Iterator<Item = &'static str> {
        BUNDLED.iter().map(|(name, _)| *name)
    }
}

impl TemplateProvider for BundledTemplates {
    fn load(&self, name: &str) -> Result<Vec<u8>> {
        BUNDLED
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .map(|(_, bytes)| bytes.to_vec())
            .ok_or_else(|| template_missing(name))
    }
}

/// Templates read from a directory, falling back to the bundled set
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    dir: PathBuf,
    fallback: BundledTemplates,
}

impl DirectoryTemplates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            fallback: BundledTemplates,
        }
    }
}

impl TemplateProvider for DirectoryTemplates {
    fn load(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(name);
        if path.is_file() {
            tracing::debug!(template = name, path = %path.display(), "Using template override");
            return fs::read(&path).map_err(|e| {
                let err = fs_error("load_template", &path, e).with_template(name);
                if err.kind() == ExErrorKind::NotFound {
                    template_missing(name)
                } else {
                    err
                }
            });
        }
        self.fallback.load(name)
    }
}
