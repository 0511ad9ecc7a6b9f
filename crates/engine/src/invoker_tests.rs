// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use yare::parameterized;

fn server() -> (Arc<Server>, Arc<Project>, ActionInvoker) {
    let core = Project::builder("core")
        .poll_interval(Duration::from_millis(5))
        .build();
    let queue = Queue::new("Builds", vec![ServerItem::from(Arc::clone(&core))]);
    let server = Server::new(
        "local",
        vec![queue.into(), Project::new("docs", Vec::new()).into()],
    );
    let invoker = ActionInvoker::new(Arc::downgrade(&server));
    (server, core, invoker)
}

fn names(actions: Vec<ActionDefinition>) -> Vec<String> {
    actions.into_iter().map(|a| a.name).collect()
}

#[test]
fn reports_server_name() {
    let (_server, _, invoker) = server();
    assert_eq!(invoker.server_name(), "urn:ccnet:local");
}

#[test]
fn server_name_is_empty_once_dropped() {
    let (server, _, invoker) = server();
    drop(server);
    assert_eq!(invoker.server_name(), "");
    assert_eq!(
        invoker.list("urn:ccnet:local"),
        Err(DispatchError::ServerUnavailable)
    );
}

#[parameterized(
    server_root = { "urn:ccnet:local", &["list-projects", "status", "version"] },
    project = { "urn:ccnet:local:core", &["force", "start", "status", "stop"] },
    queue = { "urn:ccnet:local:Builds", &["status"] },
)]
fn lists_actions_by_item_type(urn: &str, expected: &[&str]) {
    let (_server, _, invoker) = server();
    assert_eq!(names(invoker.list(urn).unwrap()), expected);
}

#[test]
fn unknown_item_is_not_found() {
    let (_server, _, invoker) = server();
    let err = invoker.invoke("urn:ccnet:local:nope", "status").unwrap_err();
    assert_eq!(err.to_string(), "Unable to find item with name 'urn:ccnet:local:nope'");
}

#[test]
fn unknown_action_is_rejected() {
    let (_server, _, invoker) = server();
    let err = invoker.invoke("urn:ccnet:local:Builds", "start").unwrap_err();
    assert_eq!(
        err,
        DispatchError::UnknownAction {
            urn: "urn:ccnet:local:Builds".into(),
            action: "start".into(),
        }
    );
}

#[test]
fn server_lists_its_projects() {
    let (_server, _, invoker) = server();
    let response = invoker.invoke("urn:ccnet:local", "list-projects").unwrap();
    assert_eq!(response.message, "core\ndocs");
    assert_eq!(response.action, "list-projects");
}

#[test]
fn version_is_the_crate_version() {
    let (_server, _, invoker) = server();
    let response = invoker.invoke("urn:ccnet:local", "VERSION").unwrap();
    assert_eq!(response.message, env!("CARGO_PKG_VERSION"));
    assert_eq!(response.action, "version");
}

#[test]
fn start_and_stop_drive_the_project() {
    let (_server, core, invoker) = server();

    invoker.invoke("urn:ccnet:local:core", "start").unwrap();
    assert_eq!(core.state(), crate::project::ProjectState::Running);
    let status = invoker.invoke("urn:ccnet:local:core", "status").unwrap();
    assert_eq!(status.message, "Running");

    let again = invoker.invoke("urn:ccnet:local:core", "start").unwrap_err();
    assert!(matches!(again, DispatchError::ActionFailed(_)));

    invoker.invoke("urn:ccnet:local:core", "stop").unwrap();
    assert!(core.wait_until_stopped(Duration::from_secs(5)));
}

#[test]
fn queue_status_counts_requests() {
    let (server, _, invoker) = server();
    let Some(Located::Item(ServerItem::Queue(queue))) = server.locate("urn:ccnet:local:Builds")
    else {
        panic!("queue not found");
    };
    let context = Arc::new(ccnet_core::IntegrationContext::new("x"));
    crate::structure::IntegrationHost::ask_to_integrate(queue.as_ref(), &context);

    let response = invoker.invoke("urn:ccnet:local:Builds", "status").unwrap();
    assert_eq!(response.message, "active: 1, pending: 0");
}
