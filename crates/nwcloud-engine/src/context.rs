//! Collaborators handed to every command

use nwcloud_core::{BackupStore, ExistingBackupPolicy, FileStore, ProjectLocator, TemplateProvider};
use nwcloud_store::{FsFileStore, MavenProjectLocator, NwcloudConfig};
use std::path::PathBuf;

/// Everything a command needs to touch the outside world
///
/// Built once per invocation and borrowed by each command; there is no
/// global lookup.
pub struct ToggleContext {
    locator: Box<dyn ProjectLocator>,
    files: Box<dyn FileStore>,
    templates: Box<dyn TemplateProvider>,
    backup_policy: ExistingBackupPolicy,
}

impl ToggleContext {
    pub fn new(
        locator: Box<dyn ProjectLocator>,
        files: Box<dyn FileStore>,
        templates: Box<dyn TemplateProvider>,
    ) -> Self {
        Self {
            locator,
            files,
            templates,
            backup_policy: ExistingBackupPolicy::default(),
        }
    }

    /// Filesystem context for the Maven project at `root`
    pub fn for_project(root: impl Into<PathBuf>, config: &NwcloudConfig) -> Self {
        Self::new(
            Box::new(MavenProjectLocator::new(root)),
            Box::new(FsFileStore::new()),
            config.template_provider(),
        )
        .with_backup_policy(config.backup.on_existing)
    }

    pub fn with_backup_policy(mut self, policy: ExistingBackupPolicy) -> Self {
        self.backup_policy = policy;
        self
    }

    pub fn locator(&self) -> &dyn ProjectLocator {
        self.locator.as_ref()
    }

    pub fn files(&self) -> &dyn FileStore {
        self.files.as_ref()
    }

    pub fn templates(&self) -> &dyn TemplateProvider {
        self.templates.as_ref()
    }

    pub fn backup_policy(&self) -> ExistingBackupPolicy {
        self.backup_policy
    }

    pub fn backups(&self) -> BackupStore<'_> {
        BackupStore::new(self.files(), self.backup_policy)
    }
}
