use nwcloud_core::{MemoryFileStore, ProjectLocator};
use std::path::{Path, PathBuf};

pub const ROOT: &str = "/project";
pub const POM: &str = "/project/pom.xml";
pub const PERSISTENCE: &str = "/project/src/main/resources/META-INF/persistence.xml";
pub const WEB: &str = "/project/src/main/webapp/WEB-INF/web.xml";
pub const DI: &str = "/project/src/main/resources/META-INF/spring/applicationContext.xml";

/// Locator for a project rooted at `/project` with `pom.xml` in the root
pub struct TestLocator {
    root: PathBuf,
    descriptor: Option<PathBuf>,
}

impl TestLocator {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(ROOT),
            descriptor: Some(PathBuf::from(POM)),
        }
    }

    #[allow(dead_code)]
    pub fn without_descriptor() -> Self {
        Self {
            root: PathBuf::from(ROOT),
            descriptor: None,
        }
    }
}

impl ProjectLocator for TestLocator {
    fn root(&self) -> &Path {
        &self.root
    }

    fn primary_descriptor_path(&self) -> Option<PathBuf> {
        self.descriptor.clone()
    }
}

/// A store holding the four descriptors of a minimal Spring web project
#[allow(dead_code)]
pub fn jpa_project() -> MemoryFileStore {
    MemoryFileStore::new()
        .with_file(POM, "<project>\n</project>\n")
        .with_file(PERSISTENCE, "<persistence/>\n")
        .with_file(WEB, "<web-app>\n</web-app>\n")
        .with_file(DI, "<beans>\n</beans>\n")
}
