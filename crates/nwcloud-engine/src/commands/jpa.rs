//! enable-jpa / disable-jpa
//!
//! Enable switches the application to the platform's JNDI data source:
//! the persistence descriptor is replaced from the bundled template, the web
//! descriptor gains a `resource-ref` for `jdbc/DefaultDB`, and the Spring
//! context swaps its `dataSource` bean for a `jee:jndi-lookup`. Each file is
//! backed up right before it is changed. Disable restores all three.

use super::{gate, missing_descriptor, ToggleCommand, ToggleReport};
use crate::context::ToggleContext;
use nwcloud_core::errors::{malformed_xml, Result};
use nwcloud_core::xml::{edit_document, parse_template, removal_description};
use nwcloud_core::{BackupOutcome, JpaTargets, XmlDocument, XmlElement};
use nwcloud_core_types::{Capability, Direction};
use nwcloud_store::templates::PERSISTENCE_TEMPLATE;
use std::path::Path;

/// JNDI name of the platform data source
pub const DATA_SOURCE_JNDI_NAME: &str = "jdbc/DefaultDB";
/// Bean id the Spring context uses for its data source
pub const DATA_SOURCE_BEAN_ID: &str = "dataSource";

pub const JEE_NAMESPACE: &str = "http://www.springframework.org/schema/jee";
pub const JEE_SCHEMA_LOCATION: &str = "http://www.springframework.org/schema/jee/spring-jee.xsd";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

const WEB_APP_PATH: &str = "/web-app";
const BEANS_PATH: &str = "/beans";

pub struct EnableJpa<'a> {
    ctx: &'a ToggleContext,
}

impl<'a> EnableJpa<'a> {
    pub fn new(ctx: &'a ToggleContext) -> Self {
        Self { ctx }
    }

    fn backup(&self, path: &Path, report: &mut ToggleReport) -> Result<()> {
        if self.ctx.backups().backup(path)? != BackupOutcome::Kept {
            report.record(format!("Backup of {}", path.display()));
        }
        Ok(())
    }
}

impl ToggleCommand for EnableJpa<'_> {
    fn name(&self) -> &'static str {
        "enable-jpa"
    }

    fn capability(&self) -> Capability {
        Capability::Jpa
    }

    fn direction(&self) -> Direction {
        Direction::Enable
    }

    fn is_available(&self) -> bool {
        gate(self.ctx, Capability::Jpa, Direction::Enable)
    }

    fn run(&self) -> Result<ToggleReport> {
        let mut report = ToggleReport::new(self.name());
        let targets = JpaTargets::locate(self.ctx.locator())
            .ok_or_else(|| missing_descriptor(self.ctx, self.name()))?;
        let files = self.ctx.files();

        // Persistence descriptor: whole-file replacement
        let persistence = self.ctx.templates().load(PERSISTENCE_TEMPLATE)?;
        parse_template(PERSISTENCE_TEMPLATE, persistence.clone())?;
        self.backup(&targets.persistence, &mut report)?;
        if files.read_bytes(&targets.persistence)? != persistence {
            files.write_bytes(
                &targets.persistence,
                &persistence,
                "Persistence config for the platform JNDI data source (needs EclipseLink)",
            )?;
            report.record(format!("Replaced {}", targets.persistence.display()));
        }

        // Web descriptor: declare the environment data source
        self.backup(&targets.web, &mut report)?;
        if edit_document(files, &targets.web, add_resource_ref)? {
            report.record(format!("Updated {}", targets.web.display()));
        }

        // Spring context: look the data source up through JNDI
        self.backup(&targets.di, &mut report)?;
        if edit_document(files, &targets.di, use_jndi_data_source)? {
            report.record(format!("Updated {}", targets.di.display()));
        }

        Ok(report)
    }
}

/// Insert the `jdbc/DefaultDB` resource-ref under `web-app` unless present
fn add_resource_ref(web: &mut XmlDocument) -> Result<String> {
    if web.root().local_name() != "web-app" {
        return Err(malformed_xml(
            "add_resource_ref",
            format!("expected root element <web-app>, found <{}>", web.root().name()),
        ));
    }
    let check = format!(
        "{}/resource-ref[res-ref-name='{}']",
        WEB_APP_PATH, DATA_SOURCE_JNDI_NAME
    );
    let inserted = web.insert_if_absent(&check, WEB_APP_PATH, |_| {
        XmlElement::new("resource-ref")
            .with_child(XmlElement::new("res-ref-name").with_text(DATA_SOURCE_JNDI_NAME))
            .with_child(XmlElement::new("res-type").with_text("javax.sql.DataSource"))
    })?;
    Ok(if inserted {
        "Added JNDI resource for JPA data source".to_string()
    } else {
        String::new()
    })
}

/// Remove the static `dataSource` bean and insert a JNDI lookup in its place
fn use_jndi_data_source(beans: &mut XmlDocument) -> Result<String> {
    let removed = beans.remove_bean_by_id(BEANS_PATH, DATA_SOURCE_BEAN_ID)?;
    let mut changes = vec![removal_description("bean", &removed, |bean| {
        bean.attribute("class").unwrap_or(DATA_SOURCE_BEAN_ID).to_string()
    })];

    let check = format!("{}/jndi-lookup[@id='{}']", BEANS_PATH, DATA_SOURCE_BEAN_ID);
    let prefix = jee_prefix(beans);
    let inserted = beans.insert_if_absent(&check, BEANS_PATH, |_| {
        XmlElement::new(format!("{}:jndi-lookup", prefix))
            .with_attribute("id", DATA_SOURCE_BEAN_ID)
            .with_attribute("jndi-name", DATA_SOURCE_JNDI_NAME)
    })?;
    if inserted {
        if beans.declare_namespace(&prefix, JEE_NAMESPACE) {
            add_schema_location(beans);
        }
        changes.push("Added bean for dynamic JNDI lookup of data source".to_string());
    }

    changes.retain(|c| !c.is_empty());
    Ok(changes.join("; "))
}

/// Prefix already bound to the jee namespace, else the first unbound one
/// of `jee`, `jee1`, `jee2`, ...
fn jee_prefix(doc: &XmlDocument) -> String {
    if let Some((prefix, _)) = doc
        .namespaces()
        .into_iter()
        .find(|(prefix, uri)| !prefix.is_empty() && uri == JEE_NAMESPACE)
    {
        return prefix;
    }
    std::iter::once("jee".to_string())
        .chain((1..).map(|n| format!("jee{}", n)))
        .find(|candidate| doc.namespace_uri(candidate).is_none())
        .unwrap_or_else(|| "jee".to_string())
}

/// Append the jee pair to an existing `xsi:schemaLocation` on the root
fn add_schema_location(doc: &mut XmlDocument) {
    let Some(xsi) = doc
        .namespaces()
        .into_iter()
        .find(|(prefix, uri)| !prefix.is_empty() && uri == XSI_NAMESPACE)
        .map(|(prefix, _)| prefix)
    else {
        return;
    };
    let attr = format!("{}:schemaLocation", xsi);
    let Some(current) = doc.root().attribute(&attr).map(str::to_string) else {
        return;
    };
    if current.split_whitespace().any(|token| token == JEE_NAMESPACE) {
        return;
    }
    let updated = format!("{} {} {}", current.trim_end(), JEE_NAMESPACE, JEE_SCHEMA_LOCATION);
    doc.root_mut().set_attribute(attr, updated);
}

pub struct DisableJpa<'a> {
    ctx: &'a ToggleContext,
}

impl<'a> DisableJpa<'a> {
    pub fn new(ctx: &'a ToggleContext) -> Self {
        Self { ctx }
    }
}

impl ToggleCommand for DisableJpa<'_> {
    fn name(&self) -> &'static str {
        "disable-jpa"
    }

    fn capability(&self) -> Capability {
        Capability::Jpa
    }

    fn direction(&self) -> Direction {
        Direction::Disable
    }

    fn is_available(&self) -> bool {
        gate(self.ctx, Capability::Jpa, Direction::Disable)
    }

    fn run(&self) -> Result<ToggleReport> {
        let mut report = ToggleReport::new(self.name());
        let targets = JpaTargets::locate(self.ctx.locator())
            .ok_or_else(|| missing_descriptor(self.ctx, self.name()))?;

        for path in targets.backed_up() {
            self.ctx.backups().revert(&path)?;
            report.record(format!("Restored {} from backup", path.display()));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_ref_inserted_once() {
        let mut web = XmlDocument::parse(
            "<web-app xmlns=\"http://java.sun.com/xml/ns/javaee\">\n    <display-name>demo</display-name>\n</web-app>",
        )
        .unwrap();

        assert!(!add_resource_ref(&mut web).unwrap().is_empty());
        assert!(add_resource_ref(&mut web).unwrap().is_empty());
        assert_eq!(
            web.find_all("/web-app/resource-ref[res-ref-name='jdbc/DefaultDB']")
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_wrong_web_root_is_malformed() {
        let mut web = XmlDocument::parse("<beans/>").unwrap();
        let err = add_resource_ref(&mut web).unwrap_err();
        assert_eq!(err.kind(), nwcloud_core::ExErrorKind::MalformedXml);
    }

    #[test]
    fn test_jndi_lookup_replaces_data_source_bean() {
        let mut beans = XmlDocument::parse(
            "<beans xmlns=\"http://www.springframework.org/schema/beans\" \
             xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
             xsi:schemaLocation=\"http://www.springframework.org/schema/beans http://www.springframework.org/schema/beans/spring-beans.xsd\">\n\
             \x20   <bean class=\"org.apache.commons.dbcp.BasicDataSource\" id=\"dataSource\"/>\n\
             \x20   <bean id=\"transactionManager\"/>\n\
             </beans>",
        )
        .unwrap();

        let description = use_jndi_data_source(&mut beans).unwrap();

        assert!(description.contains("Removal of bean: org.apache.commons.dbcp.BasicDataSource"));
        assert!(beans.find_first("/beans/bean[@id='dataSource']").unwrap().is_none());
        let lookup = beans.find_first("/beans/jee:jndi-lookup").unwrap().unwrap();
        assert_eq!(lookup.attribute("jndi-name"), Some("jdbc/DefaultDB"));
        assert_eq!(beans.namespace_uri("jee").as_deref(), Some(JEE_NAMESPACE));
        let location = beans.root().attribute("xsi:schemaLocation").unwrap();
        assert!(location.ends_with(
            "http://www.springframework.org/schema/jee http://www.springframework.org/schema/jee/spring-jee.xsd"
        ));

        // second run changes nothing
        let again = beans.to_xml_string();
        assert_eq!(use_jndi_data_source(&mut beans).unwrap(), "");
        assert_eq!(beans.to_xml_string(), again);
    }

    #[test]
    fn test_existing_jee_prefix_is_reused() {
        let mut beans = XmlDocument::parse(&format!(
            "<beans xmlns:j=\"{}\">\n</beans>",
            JEE_NAMESPACE
        ))
        .unwrap();
        use_jndi_data_source(&mut beans).unwrap();
        assert!(beans.find_first("/beans/j:jndi-lookup").unwrap().is_some());
        assert!(beans.namespace_uri("jee").is_none());
    }

    #[test]
    fn test_jee_prefix_bound_elsewhere_gets_fresh_prefix() {
        let mut beans = XmlDocument::parse(
            "<beans xmlns:jee=\"http://example.com/other\" xmlns:jee1=\"http://example.com/more\">\n</beans>",
        )
        .unwrap();

        use_jndi_data_source(&mut beans).unwrap();

        let lookup = beans.find_first("/beans/jee2:jndi-lookup").unwrap().unwrap();
        assert_eq!(lookup.attribute("jndi-name"), Some("jdbc/DefaultDB"));
        assert_eq!(beans.namespace_uri("jee2").as_deref(), Some(JEE_NAMESPACE));
        assert_eq!(beans.namespace_uri("jee").as_deref(), Some("http://example.com/other"));
        assert_eq!(jee_prefix(&beans), "jee2");
    }
}
