#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{context, spring_project};
use nwcloud_core::logging_facility::test_capture::init_test_capture;
use nwcloud_engine::{status_report, CommandRegistry};

#[test]
fn test_dispatch_brackets_command_with_start_and_end() {
    let capture = init_test_capture();
    let project = spring_project();
    let ctx = context(project.path());

    CommandRegistry::new(&ctx).dispatch("enable-deploy").unwrap();

    capture.assert_event_exists("enable-deploy", "start");
    capture.assert_event_exists("enable-deploy", "end");
    let end = capture
        .events_for("enable-deploy")
        .into_iter()
        .find(|e| e.event() == Some("end"))
        .unwrap();
    assert!(end.field("duration_ms").is_some());
}

#[test]
fn test_unavailable_command_logs_error_event() {
    let capture = init_test_capture();
    let project = spring_project();
    let ctx = context(project.path());

    let err = CommandRegistry::new(&ctx).dispatch("disable-jpa").unwrap_err();

    assert_eq!(err.kind(), nwcloud_core::ExErrorKind::CommandUnavailable);
    capture.assert_event_exists("disable-jpa", "end_error");
}

#[test]
fn test_status_serializes_for_tooling() {
    let project = spring_project();
    let ctx = context(project.path());

    let json = serde_json::to_value(status_report(&ctx)).unwrap();

    assert_eq!(json[0]["capability"], "deploy");
    assert_eq!(json[0]["state"], "disabled");
    assert_eq!(json[0]["can_enable"], true);
    assert_eq!(json[1]["capability"], "jpa");
    assert_eq!(json[1]["backups"].as_array().unwrap().len(), 3);
}
