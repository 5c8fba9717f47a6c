//! Seams between the toggle logic and the outside world
//!
//! The engine only talks to the filesystem, the project layout and the
//! template source through these traits, so every command can be exercised
//! against [`crate::memory_store::MemoryFileStore`] in tests.

use crate::errors::Result;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Byte-level file access
pub trait FileStore {
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file
    ///
    /// # Errors
    ///
    /// `NotFound` if the file is absent, `Io` on any other failure.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;

    /// Replace (or create) a file. `change` describes the edit for the log.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be written.
    fn write_bytes(&self, path: &Path, contents: &[u8], change: &str) -> Result<()>;

    /// Delete a file
    ///
    /// # Errors
    ///
    /// `NotFound` if the file is absent, `Io` on any other failure.
    fn delete(&self, path: &Path, change: &str) -> Result<()>;

    /// Convenience wrapper over [`FileStore::write_bytes`]
    ///
    /// # Errors
    ///
    /// Same as `write_bytes`.
    fn write_text(&self, path: &Path, contents: &str, change: &str) -> Result<()> {
        self.write_bytes(path, contents.as_bytes(), change)
    }
}

/// Shared stores, so a caller can keep inspecting a store it handed out
impl<T: FileStore + ?Sized> FileStore for Rc<T> {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        (**self).read_bytes(path)
    }

    fn write_bytes(&self, path: &Path, contents: &[u8], change: &str) -> Result<()> {
        (**self).write_bytes(path, contents, change)
    }

    fn delete(&self, path: &Path, change: &str) -> Result<()> {
        (**self).delete(path, change)
    }
}

/// Well-known directories of a Maven web project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectArea {
    /// Directory holding the build descriptor
    Root,
    /// `src/main/resources`
    SrcMainResources,
    /// `src/main/webapp`
    SrcMainWebapp,
    /// Directory holding the Spring application context
    SpringConfigRoot,
}

impl ProjectArea {
    /// Location relative to the project root in the conventional layout
    pub fn default_dir(&self) -> &'static str {
        match self {
            ProjectArea::Root => "",
            ProjectArea::SrcMainResources => "src/main/resources",
            ProjectArea::SrcMainWebapp => "src/main/webapp",
            ProjectArea::SpringConfigRoot => "src/main/resources/META-INF/spring",
        }
    }
}

/// Knows where the project lives and where its descriptors are
pub trait ProjectLocator {
    /// Project root directory
    fn root(&self) -> &Path;

    /// The build descriptor (`pom.xml`), if the project has one
    fn primary_descriptor_path(&self) -> Option<PathBuf>;

    /// Absolute path of `relative` inside `area`
    fn resolve(&self, area: ProjectArea, relative: &str) -> PathBuf {
        let mut path = self.root().to_path_buf();
        for part in [area.default_dir(), relative] {
            if !part.is_empty() {
                path.push(part);
            }
        }
        path
    }
}

/// Source of the bundled configuration templates
pub trait TemplateProvider {
    /// Raw bytes of the named template
    ///
    /// # Errors
    ///
    /// `TemplateMissing` if no template has that name.
    fn load(&self, name: &str) -> Result<Vec<u8>>;
}
