#![allow(dead_code)]

use nwcloud_core::MemoryFileStore;
use nwcloud_engine::ToggleContext;
use nwcloud_store::{BundledTemplates, NwcloudConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

pub const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <modelVersion>4.0.0</modelVersion>
    <groupId>com.example</groupId>
    <artifactId>demo</artifactId>
    <packaging>war</packaging>
    <build>
        <plugins>
            <plugin>
                <groupId>org.apache.maven.plugins</groupId>
                <artifactId>maven-war-plugin</artifactId>
                <version>2.1.1</version>
                <configuration>
                    <warName>legacy</warName>
                </configuration>
            </plugin>
            <plugin>
                <groupId>org.apache.maven.plugins</groupId>
                <artifactId>maven-compiler-plugin</artifactId>
                <version>2.3.2</version>
            </plugin>
        </plugins>
    </build>
</project>
"#;

pub const PERSISTENCE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<persistence xmlns="http://java.sun.com/xml/ns/persistence" version="2.0">
    <persistence-unit name="persistenceUnit" transaction-type="RESOURCE_LOCAL">
        <provider>org.hibernate.ejb.HibernatePersistence</provider>
    </persistence-unit>
</persistence>
"#;

pub const WEB: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<web-app xmlns="http://java.sun.com/xml/ns/javaee" version="2.5">
    <display-name>demo</display-name>
    <!-- Creates the Spring Container shared by all Servlets and Filters -->
    <listener>
        <listener-class>org.springframework.web.context.ContextLoaderListener</listener-class>
    </listener>
</web-app>
"#;

pub const APPLICATION_CONTEXT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<beans xmlns="http://www.springframework.org/schema/beans" xmlns:context="http://www.springframework.org/schema/context" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.springframework.org/schema/beans http://www.springframework.org/schema/beans/spring-beans-3.1.xsd http://www.springframework.org/schema/context http://www.springframework.org/schema/context/spring-context-3.1.xsd">
    <context:property-placeholder location="classpath*:META-INF/spring/*.properties"/>
    <bean class="org.apache.commons.dbcp.BasicDataSource" destroy-method="close" id="dataSource">
        <property name="driverClassName" value="${database.driverClassName}"/>
        <property name="url" value="${database.url}"/>
    </bean>
    <bean class="org.springframework.orm.jpa.JpaTransactionManager" id="transactionManager"/>
</beans>
"#;

pub const PERSISTENCE_PATH: &str = "src/main/resources/META-INF/persistence.xml";
pub const WEB_PATH: &str = "src/main/webapp/WEB-INF/web.xml";
pub const CONTEXT_PATH: &str = "src/main/resources/META-INF/spring/applicationContext.xml";

pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

pub fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

/// A Spring web project with all four descriptors
pub fn spring_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "pom.xml", POM);
    write_file(dir.path(), PERSISTENCE_PATH, PERSISTENCE);
    write_file(dir.path(), WEB_PATH, WEB);
    write_file(dir.path(), CONTEXT_PATH, APPLICATION_CONTEXT);
    dir
}

/// Filesystem context with default configuration
pub fn context(root: &Path) -> ToggleContext {
    ToggleContext::for_project(root, &NwcloudConfig::default())
}

/// Locator with a fixed root and descriptor, for in-memory contexts
pub struct FixedLocator(pub PathBuf);

impl nwcloud_core::ProjectLocator for FixedLocator {
    fn root(&self) -> &Path {
        &self.0
    }

    fn primary_descriptor_path(&self) -> Option<PathBuf> {
        Some(self.0.join("pom.xml"))
    }
}

/// In-memory context; the returned store stays inspectable
pub fn memory_context(files: MemoryFileStore) -> (ToggleContext, Rc<MemoryFileStore>) {
    let files = Rc::new(files);
    let ctx = ToggleContext::new(
        Box::new(FixedLocator(PathBuf::from("/project"))),
        Box::new(files.clone()),
        Box::new(BundledTemplates::new()),
    );
    (ctx, files)
}
