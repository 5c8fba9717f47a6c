//! Which files each capability touches

use crate::ports::{ProjectArea, ProjectLocator};
use nwcloud_core_types::Capability;
use std::path::{Path, PathBuf};

/// Staged by enable-deploy beside the build descriptor
pub const DEPLOY_PROPERTIES: &str = "nwcloud.properties";
/// Persistence descriptor, relative to `src/main/resources`
pub const PERSISTENCE_DESCRIPTOR: &str = "META-INF/persistence.xml";
/// Web descriptor, relative to `src/main/webapp`
pub const WEB_DESCRIPTOR: &str = "WEB-INF/web.xml";
/// Spring application context, relative to the Spring config directory
pub const DI_DESCRIPTOR: &str = "applicationContext.xml";

/// Files of the deploy capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTargets {
    pub build_descriptor: PathBuf,
    pub deploy_properties: PathBuf,
}

impl DeployTargets {
    /// None when the project has no build descriptor
    pub fn locate(locator: &dyn ProjectLocator) -> Option<Self> {
        Some(Self::for_descriptor(locator, locator.primary_descriptor_path()?))
    }

    /// Targets for an already resolved build descriptor
    pub fn for_descriptor(locator: &dyn ProjectLocator, build_descriptor: PathBuf) -> Self {
        let deploy_properties = match build_descriptor.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => dir.join(DEPLOY_PROPERTIES),
            None => locator.resolve(ProjectArea::Root, DEPLOY_PROPERTIES),
        };
        Self {
            build_descriptor,
            deploy_properties,
        }
    }
}

/// Files of the JPA capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpaTargets {
    pub build_descriptor: PathBuf,
    pub persistence: PathBuf,
    pub web: PathBuf,
    pub di: PathBuf,
}

impl JpaTargets {
    /// None when the project has no build descriptor
    pub fn locate(locator: &dyn ProjectLocator) -> Option<Self> {
        Some(Self::for_descriptor(locator, locator.primary_descriptor_path()?))
    }

    /// Targets for an already resolved build descriptor
    pub fn for_descriptor(locator: &dyn ProjectLocator, build_descriptor: PathBuf) -> Self {
        Self {
            build_descriptor,
            persistence: locator.resolve(ProjectArea::SrcMainResources, PERSISTENCE_DESCRIPTOR),
            web: locator.resolve(ProjectArea::SrcMainWebapp, WEB_DESCRIPTOR),
            di: locator.resolve(ProjectArea::SpringConfigRoot, DI_DESCRIPTOR),
        }
    }

    /// The descriptors enable-jpa backs up and edits
    pub fn backed_up(&self) -> [PathBuf; 3] {
        [self.persistence.clone(), self.web.clone(), self.di.clone()]
    }
}

/// Files the availability gate inspects for one capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityFiles {
    /// Must all exist before enable may run
    pub required: Vec<PathBuf>,
    /// Backed up by enable; all backups must exist before disable may run
    pub backed_up: Vec<PathBuf>,
}

impl CapabilityFiles {
    /// Gate inputs for `capability` given the resolved build descriptor
    pub fn for_descriptor(
        capability: Capability,
        locator: &dyn ProjectLocator,
        build_descriptor: &Path,
    ) -> Self {
        let descriptor = build_descriptor.to_path_buf();
        match capability {
            Capability::Deploy => Self {
                required: vec![descriptor.clone()],
                backed_up: vec![descriptor],
            },
            Capability::Jpa => {
                let targets = JpaTargets::for_descriptor(locator, descriptor);
                let backed_up = targets.backed_up().to_vec();
                let mut required = vec![targets.build_descriptor];
                required.extend(backed_up.iter().cloned());
                Self { required, backed_up }
            }
        }
    }
}

/// Gate inputs for `capability`, or None if the project has no build descriptor
pub fn capability_files(capability: Capability, locator: &dyn ProjectLocator) -> Option<CapabilityFiles> {
    let descriptor = locator.primary_descriptor_path()?;
    Some(CapabilityFiles::for_descriptor(capability, locator, &descriptor))
}
