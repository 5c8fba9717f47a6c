//! `FileStore` over the local filesystem

use crate::errors::fs_error;
use crate::fs::atomic::atomic_write;
use nwcloud_core::errors::{not_found, Result};
use nwcloud_core::FileStore;
use std::fs;
use std::path::Path;

/// Filesystem-backed [`FileStore`]
///
/// Each write is atomic on its own; nothing spans several files.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileStore;

impl FsFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for FsFileStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| fs_error("read", path, e))
    }

    fn write_bytes(&self, path: &Path, contents: &[u8], change: &str) -> Result<()> {
        let existed = path.exists();
        atomic_write(path, contents)?;
        tracing::info!(
            path = %path.display(),
            "{} {}{}",
            if existed { "Updated" } else { "Created" },
            path.display(),
            describe(change)
        );
        Ok(())
    }

    fn delete(&self, path: &Path, change: &str) -> Result<()> {
        if !path.is_file() {
            return Err(not_found("delete", path));
        }
        fs::remove_file(path).map_err(|e| fs_error("delete", path, e))?;
        tracing::info!(path = %path.display(), "Deleted {}{}", path.display(), describe(change));
        Ok(())
    }
}

fn describe(change: &str) -> String {
    if change.is_empty() {
        String::new()
    } else {
        format!(" [{}]", change)
    }
}
