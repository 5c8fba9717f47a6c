//! Maven project layout

use nwcloud_core::ProjectLocator;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the Maven build descriptor
pub const BUILD_DESCRIPTOR: &str = "pom.xml";

/// [`ProjectLocator`] for a Maven web project
///
/// The build descriptor is looked for in the root, then in each direct
/// sub-directory in name order. When several are found the first is used.
#[derive(Debug, Clone)]
pub struct MavenProjectLocator {
    root: PathBuf,
}

impl MavenProjectLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Every build descriptor found, root first
    pub fn discover_descriptors(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        let at_root = self.root.join(BUILD_DESCRIPTOR);
        if at_root.is_file() {
            found.push(at_root);
        }

        let mut subdirs: Vec<PathBuf> = match fs::read_dir(&self.root) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect(),
            Err(e) => {
                tracing::debug!(root = %self.root.display(), "Cannot list project root: {}", e);
                Vec::new()
            }
        };
        subdirs.sort();
        found.extend(
            subdirs
                .into_iter()
                .map(|dir| dir.join(BUILD_DESCRIPTOR))
                .filter(|path| path.is_file()),
        );
        found
    }
}

impl ProjectLocator for MavenProjectLocator {
    fn root(&self) -> &Path {
        &self.root
    }

    fn primary_descriptor_path(&self) -> Option<PathBuf> {
        let mut found = self.discover_descriptors();
        if found.len() > 1 {
            tracing::warn!(
                count = found.len(),
                "Found more than one {}, using {}",
                BUILD_DESCRIPTOR,
                found[0].display()
            );
        }
        if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        }
    }
}
