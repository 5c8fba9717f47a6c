//! Availability predicates
//!
//! Pure functions of file and backup presence. Nothing here mutates state,
//! caches a result, or fails because a file is absent.

use crate::backup::backup_path;
use crate::ports::{FileStore, ProjectLocator};
use crate::targets::{capability_files, CapabilityFiles};
use nwcloud_core_types::{Capability, ToggleState};

impl CapabilityFiles {
    /// True iff every backup exists
    pub fn can_disable(&self, files: &dyn FileStore) -> bool {
        !self.backed_up.is_empty()
            && self
                .backed_up
                .iter()
                .all(|path| files.exists(&backup_path(path)))
    }

    /// True iff every required file exists and the capability is not enabled
    pub fn can_enable(&self, files: &dyn FileStore) -> bool {
        self.required.iter().all(|path| files.exists(path)) && !self.can_disable(files)
    }

    /// `Enabled` iff the capability can be disabled
    pub fn state(&self, files: &dyn FileStore) -> ToggleState {
        if self.can_disable(files) {
            ToggleState::Enabled
        } else {
            ToggleState::Disabled
        }
    }
}

/// True iff every backup of `capability` exists
pub fn can_disable(capability: Capability, locator: &dyn ProjectLocator, files: &dyn FileStore) -> bool {
    capability_files(capability, locator).is_some_and(|set| set.can_disable(files))
}

/// True iff the files `capability` needs exist and it is not already enabled
pub fn can_enable(capability: Capability, locator: &dyn ProjectLocator, files: &dyn FileStore) -> bool {
    capability_files(capability, locator).is_some_and(|set| set.can_enable(files))
}

/// `Enabled` iff the capability can be disabled
pub fn compute_state(capability: Capability, locator: &dyn ProjectLocator, files: &dyn FileStore) -> ToggleState {
    capability_files(capability, locator)
        .map(|set| set.state(files))
        .unwrap_or(ToggleState::Disabled)
}
