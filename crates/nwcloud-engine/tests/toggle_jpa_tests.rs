#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{
    context, memory_context, read, spring_project, APPLICATION_CONTEXT, CONTEXT_PATH, PERSISTENCE,
    PERSISTENCE_PATH, POM, WEB, WEB_PATH,
};
use nwcloud_core::{backup_path, ExErrorKind, ExistingBackupPolicy, MemoryFileStore, XmlDocument};
use nwcloud_core_types::{Capability, ToggleState};
use nwcloud_engine::{apply_toggle_action, status_report, CommandRegistry, ToggleAction};
use std::fs;

#[test]
fn test_enable_jpa_rewrites_all_three_descriptors() {
    // GIVEN a Spring project with a static data source
    let project = spring_project();
    let ctx = context(project.path());

    // WHEN enable-jpa runs
    let report = CommandRegistry::new(&ctx).dispatch("enable-jpa").unwrap();
    assert_eq!(report.command, "enable-jpa");

    // THEN the persistence descriptor is the bundled one
    let persistence = read(project.path(), PERSISTENCE_PATH);
    assert!(persistence.contains("java:comp/env/jdbc/DefaultDB"));

    // AND web.xml declares the resource
    let web = XmlDocument::parse(&read(project.path(), WEB_PATH)).unwrap();
    assert_eq!(
        web.find_all("/web-app/resource-ref[res-ref-name='jdbc/DefaultDB']")
            .unwrap()
            .len(),
        1
    );

    // AND the Spring context looks the data source up
    let beans = XmlDocument::parse(&read(project.path(), CONTEXT_PATH)).unwrap();
    assert!(beans.find_first("/beans/bean[@id='dataSource']").unwrap().is_none());
    let lookup = beans.find_first("/beans/jee:jndi-lookup").unwrap().unwrap();
    assert_eq!(lookup.attribute("id"), Some("dataSource"));
    assert!(beans.find_first("/beans/bean[@id='transactionManager']").unwrap().is_some());

    // AND every touched file has a backup holding its original bytes
    for (relative, original) in [
        (PERSISTENCE_PATH, PERSISTENCE),
        (WEB_PATH, WEB),
        (CONTEXT_PATH, APPLICATION_CONTEXT),
    ] {
        let backup = backup_path(&project.path().join(relative));
        assert_eq!(fs::read_to_string(backup).unwrap(), original, "{}", relative);
    }
}

#[test]
fn test_enable_then_disable_restores_every_file() {
    let project = spring_project();
    let ctx = context(project.path());
    let registry = CommandRegistry::new(&ctx);

    registry.dispatch("enable-jpa").unwrap();
    assert!(registry.find("disable-jpa").unwrap().is_available());
    registry.dispatch("disable-jpa").unwrap();

    assert_eq!(read(project.path(), PERSISTENCE_PATH), PERSISTENCE);
    assert_eq!(read(project.path(), WEB_PATH), WEB);
    assert_eq!(read(project.path(), CONTEXT_PATH), APPLICATION_CONTEXT);
    for relative in [PERSISTENCE_PATH, WEB_PATH, CONTEXT_PATH] {
        assert!(!backup_path(&project.path().join(relative)).exists());
    }
    assert!(registry.find("enable-jpa").unwrap().is_available());
}

#[test]
fn test_repeated_enable_inserts_each_element_once() {
    // GIVEN an enabled project, with backups kept on repeat
    let project = spring_project();
    let ctx = context(project.path()).with_backup_policy(ExistingBackupPolicy::Skip);
    apply_toggle_action(ToggleAction::EnableJpa, &ctx).unwrap();
    let web_after_first = read(project.path(), WEB_PATH);
    let context_after_first = read(project.path(), CONTEXT_PATH);

    // WHEN enable runs again directly
    let report = apply_toggle_action(ToggleAction::EnableJpa, &ctx).unwrap();

    // THEN nothing changes and the backups still hold the originals
    assert!(report.changes.is_empty(), "{:?}", report.changes);
    assert_eq!(read(project.path(), WEB_PATH), web_after_first);
    assert_eq!(read(project.path(), CONTEXT_PATH), context_after_first);
    let web_backup = backup_path(&project.path().join(WEB_PATH));
    assert_eq!(fs::read_to_string(web_backup).unwrap(), WEB);
}

#[test]
fn test_fail_policy_refuses_to_touch_existing_backup() {
    let project = spring_project();
    let ctx = context(project.path()).with_backup_policy(ExistingBackupPolicy::Fail);
    apply_toggle_action(ToggleAction::EnableJpa, &ctx).unwrap();

    let err = apply_toggle_action(ToggleAction::EnableJpa, &ctx).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::BackupAlreadyExists);
}

#[test]
fn test_jpa_availability_needs_every_descriptor() {
    let project = spring_project();
    fs::remove_file(project.path().join(WEB_PATH)).unwrap();
    let ctx = context(project.path());

    let registry = CommandRegistry::new(&ctx);

    assert!(!registry.find("enable-jpa").unwrap().is_available());
    assert!(registry.find("enable-deploy").unwrap().is_available());
}

#[test]
fn test_disable_needs_the_full_backup_set() {
    // GIVEN an enabled project that lost one backup
    let project = spring_project();
    let ctx = context(project.path());
    let registry = CommandRegistry::new(&ctx);
    registry.dispatch("enable-jpa").unwrap();
    fs::remove_file(backup_path(&project.path().join(WEB_PATH))).unwrap();

    // THEN disable is withdrawn and enable is offered again
    assert!(!registry.find("disable-jpa").unwrap().is_available());
    assert!(registry.find("enable-jpa").unwrap().is_available());
    let jpa = status_report(&ctx)
        .into_iter()
        .find(|s| s.capability == Capability::Jpa)
        .unwrap();
    assert_eq!(jpa.state, ToggleState::Disabled);
    assert_eq!(jpa.backups.iter().filter(|b| b.present).count(), 2);
}

#[test]
fn test_deploy_and_jpa_are_independent() {
    let project = spring_project();
    let ctx = context(project.path());
    let registry = CommandRegistry::new(&ctx);

    registry.dispatch("enable-deploy").unwrap();
    registry.dispatch("enable-jpa").unwrap();
    registry.dispatch("disable-deploy").unwrap();

    assert_eq!(read(project.path(), "pom.xml"), POM);
    assert!(registry.find("disable-jpa").unwrap().is_available());
    registry.dispatch("disable-jpa").unwrap();
    assert_eq!(read(project.path(), CONTEXT_PATH), APPLICATION_CONTEXT);
}

#[test]
fn test_malformed_context_fails_after_earlier_edits() {
    // GIVEN an in-memory project whose Spring context is not well formed
    let files = MemoryFileStore::new()
        .with_file("/project/pom.xml", POM)
        .with_file(format!("/project/{}", PERSISTENCE_PATH), PERSISTENCE)
        .with_file(format!("/project/{}", WEB_PATH), WEB)
        .with_file(format!("/project/{}", CONTEXT_PATH), "<beans><bean></beans>");
    let (ctx, files) = memory_context(files);

    // WHEN enable-jpa runs
    let err = apply_toggle_action(ToggleAction::EnableJpa, &ctx).unwrap_err();

    // THEN the failure names the file and earlier edits stay in place
    assert_eq!(err.kind(), ExErrorKind::MalformedXml);
    let context_path = std::path::PathBuf::from(format!("/project/{}", CONTEXT_PATH));
    assert_eq!(err.path(), Some(context_path.as_path()));
    let web = files
        .text(std::path::Path::new(&format!("/project/{}", WEB_PATH)))
        .unwrap();
    assert!(web.contains("jdbc/DefaultDB"));
    assert!(files.contents(&backup_path(&context_path)).is_some());
}
