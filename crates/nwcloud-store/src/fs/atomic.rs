//! Whole-file replacement without torn writes
//!
//! Readers see either the old bytes or the new bytes of a descriptor, never
//! a prefix.

use crate::errors::{fs_error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Write `content` to a sibling temp file, then rename it over the target.
/// Parent directories are created as needed.
///
/// # Errors
///
/// `Io` if any step fails; the temp file is removed on a failed rename.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| fs_error("create_dir", parent, e))?;
    }

    // Temp file next to the target so the rename stays on one filesystem
    let temp_path = temp_path_for(target_path);

    fs::write(&temp_path, content).map_err(|e| fs_error("write_temp", &temp_path, e))?;

    if let Err(e) = fs::rename(&temp_path, target_path) {
        fs::remove_file(&temp_path).ok();
        return Err(fs_error("rename_temp", target_path, e));
    }

    Ok(())
}

/// `<full file name>.tmp` beside the target
fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
