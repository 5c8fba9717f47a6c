//! Build plugin identity

use crate::xml::document::XmlElement;
use std::fmt;

/// Group assumed for a `<plugin>` without a `<groupId>`
pub const DEFAULT_GROUP_ID: &str = "org.apache.maven.plugins";

/// Coordinates of a build plugin. Two plugins are the same plugin iff group
/// and artifact match; the version is informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
}

impl PluginDescriptor {
    /// Read coordinates from a `<plugin>` element; None without an artifactId
    pub fn from_element(el: &XmlElement) -> Option<Self> {
        let artifact_id = el.child_text("artifactId").filter(|a| !a.is_empty())?;
        let group_id = el
            .child_text("groupId")
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| DEFAULT_GROUP_ID.to_string());
        let version = el.child_text("version").filter(|v| !v.is_empty());
        Some(Self {
            group_id,
            artifact_id,
            version,
        })
    }

    pub fn identity(&self) -> (&str, &str) {
        (&self.group_id, &self.artifact_id)
    }

    pub fn same_plugin(&self, other: &PluginDescriptor) -> bool {
        self.identity() == other.identity()
    }

    /// True if `el` is a plugin with this identity
    pub fn matches(&self, el: &XmlElement) -> bool {
        Self::from_element(el).is_some_and(|other| self.same_plugin(&other))
    }
}

impl fmt::Display for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}
