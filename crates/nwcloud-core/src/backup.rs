//! Per-file backups under a fixed suffix
//!
//! The existence of `<path>.pre.nwcloud` is the only record that `<path>` was
//! modified by an enable command and not yet reverted.

use crate::errors::{backup_already_exists, backup_missing, not_found, ExError, ExErrorKind, Result};
use crate::ports::FileStore;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Appended to a file's path to name its backup
pub const BACKUP_SUFFIX: &str = ".pre.nwcloud";

/// Backup location for `path`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// What to do when a backup is requested for a file that already has one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingBackupPolicy {
    /// Keep the existing backup; it holds the pristine original
    #[default]
    Skip,
    /// Refuse with `BackupAlreadyExists`
    Fail,
    /// Replace the existing backup with the current contents
    Overwrite,
}

impl ExistingBackupPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExistingBackupPolicy::Skip => "skip",
            ExistingBackupPolicy::Fail => "fail",
            ExistingBackupPolicy::Overwrite => "overwrite",
        }
    }
}

impl FromStr for ExistingBackupPolicy {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(ExistingBackupPolicy::Skip),
            "fail" => Ok(ExistingBackupPolicy::Fail),
            "overwrite" => Ok(ExistingBackupPolicy::Overwrite),
            other => Err(ExError::new(ExErrorKind::Config)
                .with_op("parse_backup_policy")
                .with_message(format!(
                    "unknown backup policy '{}' (expected skip, fail or overwrite)",
                    other
                ))),
        }
    }
}

/// Result of a [`BackupStore::backup`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupOutcome {
    /// No backup existed; one now holds the current contents
    Created,
    /// A backup existed and was left as is
    Kept,
    /// A backup existed and was replaced
    Overwritten,
}

/// Creates and restores backups through a [`FileStore`]
pub struct BackupStore<'a> {
    files: &'a dyn FileStore,
    policy: ExistingBackupPolicy,
}

impl<'a> BackupStore<'a> {
    pub fn new(files: &'a dyn FileStore, policy: ExistingBackupPolicy) -> Self {
        Self { files, policy }
    }

    pub fn policy(&self) -> ExistingBackupPolicy {
        self.policy
    }

    pub fn has_backup(&self, path: &Path) -> bool {
        self.files.exists(&backup_path(path))
    }

    /// Copy `path` to its backup location
    ///
    /// # Errors
    ///
    /// `NotFound` if `path` is absent, `BackupAlreadyExists` under
    /// [`ExistingBackupPolicy::Fail`], `Io` on store failure.
    pub fn backup(&self, path: &Path) -> Result<BackupOutcome> {
        if !self.files.exists(path) {
            return Err(not_found("backup", path));
        }
        let target = backup_path(path);
        let outcome = if self.files.exists(&target) {
            match self.policy {
                ExistingBackupPolicy::Skip => {
                    tracing::warn!(
                        path = %path.display(),
                        "Backup already exists, keeping it: {}",
                        target.display()
                    );
                    return Ok(BackupOutcome::Kept);
                }
                ExistingBackupPolicy::Fail => return Err(backup_already_exists(&target)),
                ExistingBackupPolicy::Overwrite => BackupOutcome::Overwritten,
            }
        } else {
            BackupOutcome::Created
        };

        let bytes = self.files.read_bytes(path)?;
        self.files.write_bytes(
            &target,
            &bytes,
            &format!("Backup of {}", file_label(path)),
        )?;
        Ok(outcome)
    }

    /// Restore `path` from its backup and delete the backup
    ///
    /// # Errors
    ///
    /// `BackupMissing` if there is no backup, `Io` on store failure.
    pub fn revert(&self, path: &Path) -> Result<()> {
        let source = backup_path(path);
        if !self.files.exists(&source) {
            return Err(backup_missing(&source));
        }
        let bytes = self.files.read_bytes(&source)?;
        self.files.write_bytes(
            path,
            &bytes,
            &format!("Restore {} from backup", file_label(path)),
        )?;
        self.files.delete(
            &source,
            &format!("Delete backup of {}", file_label(path)),
        )?;
        Ok(())
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryFileStore;

    const POM: &str = "/p/pom.xml";

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/p/pom.xml")),
            PathBuf::from("/p/pom.xml.pre.nwcloud")
        );
    }

    #[test]
    fn test_backup_then_revert_restores_bytes() {
        let files = MemoryFileStore::new().with_file(POM, "original");
        let store = BackupStore::new(&files, ExistingBackupPolicy::Skip);
        let path = Path::new(POM);

        assert_eq!(store.backup(path).unwrap(), BackupOutcome::Created);
        assert!(store.has_backup(path));

        files.write_text(path, "edited", "edit").unwrap();
        store.revert(path).unwrap();

        assert_eq!(files.text(path).as_deref(), Some("original"));
        assert!(!store.has_backup(path));
    }

    #[test]
    fn test_backup_missing_source() {
        let files = MemoryFileStore::new();
        let store = BackupStore::new(&files, ExistingBackupPolicy::Skip);
        let err = store.backup(Path::new(POM)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
    }

    #[test]
    fn test_revert_without_backup() {
        let files = MemoryFileStore::new().with_file(POM, "x");
        let store = BackupStore::new(&files, ExistingBackupPolicy::Skip);
        let err = store.revert(Path::new(POM)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::BackupMissing);
        assert_eq!(files.text(Path::new(POM)).as_deref(), Some("x"));
    }

    #[test]
    fn test_existing_backup_policies() {
        let path = Path::new(POM);
        let seeded = || {
            MemoryFileStore::new()
                .with_file(POM, "current")
                .with_file(backup_path(path), "pristine")
        };

        let files = seeded();
        let outcome = BackupStore::new(&files, ExistingBackupPolicy::Skip)
            .backup(path)
            .unwrap();
        assert_eq!(outcome, BackupOutcome::Kept);
        assert_eq!(files.text(&backup_path(path)).as_deref(), Some("pristine"));

        let files = seeded();
        let err = BackupStore::new(&files, ExistingBackupPolicy::Fail)
            .backup(path)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::BackupAlreadyExists);

        let files = seeded();
        let outcome = BackupStore::new(&files, ExistingBackupPolicy::Overwrite)
            .backup(path)
            .unwrap();
        assert_eq!(outcome, BackupOutcome::Overwritten);
        assert_eq!(files.text(&backup_path(path)).as_deref(), Some("current"));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Skip".parse::<ExistingBackupPolicy>().unwrap(), ExistingBackupPolicy::Skip);
        assert_eq!(
            "overwrite".parse::<ExistingBackupPolicy>().unwrap(),
            ExistingBackupPolicy::Overwrite
        );
        let err = "sometimes".parse::<ExistingBackupPolicy>().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Config);
    }
}
