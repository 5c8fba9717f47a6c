//! enable-deploy / disable-deploy
//!
//! Enable replaces the project's build plugins with the ones listed in the
//! `configuration.xml` template (matched by group and artifact) and stages
//! `nwcloud.properties` in the project root. Disable restores the build
//! descriptor and removes the properties file.

use super::{gate, missing_descriptor, ToggleCommand, ToggleReport};
use crate::context::ToggleContext;
use nwcloud_core::errors::Result;
use nwcloud_core::xml::{edit_document, parse_template, removal_description};
use nwcloud_core::{BackupOutcome, DeployTargets, PluginDescriptor, XmlDocument, XmlElement};
use nwcloud_core_types::{Capability, Direction};
use nwcloud_store::templates::{CONFIGURATION_TEMPLATE, DEPLOY_PROPERTIES_TEMPLATE};

/// Container of build plugins in the build descriptor
pub const PLUGINS_PATH: &str = "/project/build/plugins";
/// Plugins to install, inside the `configuration.xml` template
pub const TEMPLATE_PLUGINS_PATH: &str = "/configuration/nwcloud/build/plugins/plugin";

pub struct EnableDeploy<'a> {
    ctx: &'a ToggleContext,
}

impl<'a> EnableDeploy<'a> {
    pub fn new(ctx: &'a ToggleContext) -> Self {
        Self { ctx }
    }
}

impl ToggleCommand for EnableDeploy<'_> {
    fn name(&self) -> &'static str {
        "enable-deploy"
    }

    fn capability(&self) -> Capability {
        Capability::Deploy
    }

    fn direction(&self) -> Direction {
        Direction::Enable
    }

    fn is_available(&self) -> bool {
        gate(self.ctx, Capability::Deploy, Direction::Enable)
    }

    fn run(&self) -> Result<ToggleReport> {
        let mut report = ToggleReport::new(self.name());
        let targets = DeployTargets::locate(self.ctx.locator())
            .ok_or_else(|| missing_descriptor(self.ctx, self.name()))?;

        let template = parse_template(
            CONFIGURATION_TEMPLATE,
            self.ctx.templates().load(CONFIGURATION_TEMPLATE)?,
        )?;

        if self.ctx.backups().backup(&targets.build_descriptor)? != BackupOutcome::Kept {
            report.record(format!("Backup of {}", targets.build_descriptor.display()));
        }

        let changed = edit_document(self.ctx.files(), &targets.build_descriptor, |pom| {
            replace_plugins(pom, &template)
        })?;
        if changed {
            report.record(format!(
                "Updated build plugins in {}",
                targets.build_descriptor.display()
            ));
        }

        let properties = self.ctx.templates().load(DEPLOY_PROPERTIES_TEMPLATE)?;
        self.ctx.files().write_bytes(
            &targets.deploy_properties,
            &properties,
            "Config file for maven-nwcloud-plugin",
        )?;
        report.record(format!("Staged {}", targets.deploy_properties.display()));

        Ok(report)
    }
}

/// Remove every plugin sharing an identity with a template plugin, then
/// append each template plugin. Returns the change description.
fn replace_plugins(pom: &mut XmlDocument, template: &XmlDocument) -> Result<String> {
    let wanted: Vec<(PluginDescriptor, XmlElement)> = template
        .find_all(TEMPLATE_PLUGINS_PATH)?
        .into_iter()
        .filter_map(|el| match PluginDescriptor::from_element(el) {
            Some(descriptor) => Some((descriptor, el.clone())),
            None => {
                tracing::warn!(
                    template = CONFIGURATION_TEMPLATE,
                    "Skipping template plugin without artifactId"
                );
                None
            }
        })
        .collect();

    if wanted.is_empty() {
        tracing::warn!(
            template = CONFIGURATION_TEMPLATE,
            "Getting elements '{}' from '{}' returned 0 matching elements",
            TEMPLATE_PLUGINS_PATH,
            CONFIGURATION_TEMPLATE
        );
        return Ok(String::new());
    }

    pom.ensure_path(PLUGINS_PATH)?;

    let removed = pom.remove_matching(PLUGINS_PATH, "plugin", |existing| {
        wanted.iter().any(|(descriptor, _)| descriptor.matches(existing))
    })?;

    let mut added = Vec::new();
    for (descriptor, element) in &wanted {
        pom.append_raw(PLUGINS_PATH, element, Some(template))?;
        added.push(descriptor.artifact_id.clone());
    }

    let mut description = removal_description("build plugin", &removed, |plugin| {
        PluginDescriptor::from_element(plugin)
            .map(|d| d.artifact_id)
            .unwrap_or_default()
    });
    if !description.is_empty() {
        description.push_str("; ");
    }
    description.push_str(&format!("Addition of build plugin: {}", added.join(", ")));
    Ok(description)
}

pub struct DisableDeploy<'a> {
    ctx: &'a ToggleContext,
}

impl<'a> DisableDeploy<'a> {
    pub fn new(ctx: &'a ToggleContext) -> Self {
        Self { ctx }
    }
}

impl ToggleCommand for DisableDeploy<'_> {
    fn name(&self) -> &'static str {
        "disable-deploy"
    }

    fn capability(&self) -> Capability {
        Capability::Deploy
    }

    fn direction(&self) -> Direction {
        Direction::Disable
    }

    fn is_available(&self) -> bool {
        gate(self.ctx, Capability::Deploy, Direction::Disable)
    }

    fn run(&self) -> Result<ToggleReport> {
        let mut report = ToggleReport::new(self.name());
        let targets = DeployTargets::locate(self.ctx.locator())
            .ok_or_else(|| missing_descriptor(self.ctx, self.name()))?;

        self.ctx.backups().revert(&targets.build_descriptor)?;
        report.record(format!(
            "Restored {} from backup",
            targets.build_descriptor.display()
        ));

        if self.ctx.files().exists(&targets.deploy_properties) {
            self.ctx.files().delete(
                &targets.deploy_properties,
                "Delete config file for maven-nwcloud-plugin",
            )?;
            report.record(format!("Deleted {}", targets.deploy_properties.display()));
        } else {
            tracing::warn!(
                path = %targets.deploy_properties.display(),
                "{} was already deleted",
                targets.deploy_properties.display()
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"<configuration><nwcloud><build><plugins>
        <plugin><groupId>g</groupId><artifactId>one</artifactId></plugin>
        <plugin><artifactId>maven-war-plugin</artifactId><version>2.2</version></plugin>
    </plugins></build></nwcloud></configuration>"#;

    #[test]
    fn test_replace_plugins_creates_container() {
        let mut pom = XmlDocument::parse("<project>\n</project>").unwrap();
        let template = XmlDocument::parse(TEMPLATE).unwrap();

        let description = replace_plugins(&mut pom, &template).unwrap();

        assert_eq!(description, "Addition of build plugin: one, maven-war-plugin");
        assert_eq!(pom.find_all("/project/build/plugins/plugin").unwrap().len(), 2);
    }

    #[test]
    fn test_replace_plugins_removes_before_appending() {
        let mut pom = XmlDocument::parse(
            "<project><build><plugins>\
             <plugin><groupId>org.apache.maven.plugins</groupId><artifactId>maven-war-plugin</artifactId><version>1.0</version></plugin>\
             <plugin><groupId>x</groupId><artifactId>keep</artifactId></plugin>\
             </plugins></build></project>",
        )
        .unwrap();
        let template = XmlDocument::parse(TEMPLATE).unwrap();

        let description = replace_plugins(&mut pom, &template).unwrap();

        assert!(description.starts_with("Removal of build plugin: maven-war-plugin; "));
        let names: Vec<String> = pom
            .find_all("/project/build/plugins/plugin")
            .unwrap()
            .iter()
            .filter_map(|p| p.child_text("artifactId"))
            .collect();
        assert_eq!(names, vec!["keep", "one", "maven-war-plugin"]);
    }

    #[test]
    fn test_empty_template_changes_nothing() {
        let mut pom = XmlDocument::parse("<project/>").unwrap();
        let template = XmlDocument::parse("<configuration/>").unwrap();

        assert_eq!(replace_plugins(&mut pom, &template).unwrap(), "");
        assert_eq!(pom.to_xml_string(), "<project/>");
    }
}
