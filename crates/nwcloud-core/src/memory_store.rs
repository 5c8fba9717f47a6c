//! In-memory file store for tests and dry runs

use crate::errors::{io_error, not_found, Result};
use crate::ports::FileStore;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// A [`FileStore`] backed by a map, recording every write and delete
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
    log: RefCell<Vec<(PathBuf, String)>>,
    failing: BTreeSet<PathBuf>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: seed a file
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Self {
        self.files
            .borrow_mut()
            .insert(path.as_ref().to_path_buf(), contents.as_ref().to_vec());
        self
    }

    /// Builder: make writes and deletes of `path` fail with an I/O error
    pub fn fail_on_write(mut self, path: impl AsRef<Path>) -> Self {
        self.failing.insert(path.as_ref().to_path_buf());
        self
    }

    /// Current contents of a file
    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    /// Current contents of a file as UTF-8
    pub fn text(&self, path: &Path) -> Option<String> {
        self.contents(path)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// Every path currently stored
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    /// (path, change) for every successful write or delete, in order
    pub fn change_log(&self) -> Vec<(PathBuf, String)> {
        self.log.borrow().clone()
    }

    fn check_writable(&self, op: &str, path: &Path) -> Result<()> {
        if self.failing.contains(path) {
            return Err(io_error(
                op,
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "write refused"),
            ));
        }
        Ok(())
    }
}

impl FileStore for MemoryFileStore {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        self.contents(path)
            .ok_or_else(|| not_found("read", path))
    }

    fn write_bytes(&self, path: &Path, contents: &[u8], change: &str) -> Result<()> {
        self.check_writable("write", path)?;
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_vec());
        self.log
            .borrow_mut()
            .push((path.to_path_buf(), change.to_string()));
        Ok(())
    }

    fn delete(&self, path: &Path, change: &str) -> Result<()> {
        self.check_writable("delete", path)?;
        if self.files.borrow_mut().remove(path).is_none() {
            return Err(not_found("delete", path));
        }
        self.log
            .borrow_mut()
            .push((path.to_path_buf(), change.to_string()));
        Ok(())
    }
}
