// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::loader::TomlConfigurationService;
use crate::project::{Project, ProjectState};
use crate::structure::ServerItem;
use ccnet_adapters::{ChannelCall, FakeChannel, FakeFileSystem};
use ccnet_core::{
    CollectingValidationLog, FakeClock, IntegrationRequest, IntegrationStatus, TaskState,
};
use std::time::Duration;
use yare::parameterized;

const CONFIG_PATH: &str = "/etc/ccnet/ccnet.toml";

fn application(content: &str) -> (FakeFileSystem, Application) {
    let fs = FakeFileSystem::new();
    fs.add_file(CONFIG_PATH, content);
    let app = Application::new()
        .with_configuration_service(Arc::new(TomlConfigurationService::new()))
        .with_file_system(Arc::new(fs.clone()))
        .with_validation_log(Box::new(CollectingValidationLog::new()));
    (fs, app)
}

#[parameterized(
    service = { Application::new(), "ConfigurationService" },
    file_system = {
        Application::new().with_configuration_service(Arc::new(TomlConfigurationService::new())),
        "FileSystem"
    },
    validation_log = {
        Application::new()
            .with_configuration_service(Arc::new(TomlConfigurationService::new()))
            .with_file_system(Arc::new(FakeFileSystem::new())),
        "ValidationLog"
    },
)]
fn load_requires_collaborators(app: Application, missing: &str) {
    let mut app = app;
    let err = app.load_configuration(Path::new(CONFIG_PATH)).unwrap_err();
    assert_eq!(err.to_string(), format!("{} has not been initialised", missing));
}

#[test]
fn load_reads_through_the_file_system() {
    let (fs, mut app) = application("[server]\nname = \"local\"\n[[project]]\nname = \"core\"\n");
    let server = app.load_configuration(Path::new(CONFIG_PATH)).unwrap();

    assert_eq!(server.name(), "local");
    assert!(Arc::ptr_eq(app.configuration().unwrap(), &server));
    assert_eq!(
        fs.calls(),
        vec![ccnet_adapters::FsCall::Read(CONFIG_PATH.into())]
    );
}

#[test]
fn validation_errors_are_fatal() {
    let (_, mut app) = application(
        "[server]\nname = \"local\"\n[[project]]\nname = \"core\"\n[[project]]\nname = \"core\"\n",
    );
    let err = app.load_configuration(Path::new(CONFIG_PATH)).unwrap_err();

    assert!(matches!(err, ApplicationError::FatalConfiguration { errors: 2 }));
    assert_eq!(err.to_string(), "Fatal errors found in configuration");
    assert!(app.configuration().is_none());
    assert_eq!(app.validation_log().unwrap().number_of_errors(), 2);
}

#[test]
fn warnings_do_not_stop_loading() {
    let (_, mut app) = application(
        "[server]\nname = \"local\"\n[[project]]\nname = \"core\"\n[[project.task]]\nkind = \"comment\"\n",
    );
    app.load_configuration(Path::new(CONFIG_PATH)).unwrap();
    let log = app.validation_log().unwrap();
    assert_eq!(log.number_of_errors(), 0);
    assert_eq!(log.number_of_warnings(), 1);
}

#[test]
fn missing_file_is_an_error() {
    let fs = FakeFileSystem::new();
    let mut app = Application::new()
        .with_configuration_service(Arc::new(TomlConfigurationService::new()))
        .with_file_system(Arc::new(fs))
        .with_validation_log(Box::new(CollectingValidationLog::new()));
    let err = app.load_configuration(Path::new(CONFIG_PATH)).unwrap_err();
    assert!(matches!(err, ApplicationError::Fs(_)));
}

#[test]
fn start_requires_configuration() {
    let err = Application::new().start().unwrap_err();
    assert_eq!(err.to_string(), "Configuration has not been initialised");
}

#[test]
fn start_and_stop_drive_projects_and_channels() {
    let project = Project::builder("core")
        .poll_interval(Duration::from_millis(5))
        .build();
    let server = Server::new("local", vec![ServerItem::from(Arc::clone(&project))]);
    let channel = FakeChannel::new("socket");
    server.add_channel(Arc::new(channel.clone()));
    let app = Application::new().with_configuration(server);

    app.start().unwrap();
    assert_eq!(project.state(), ProjectState::Running);
    assert_eq!(channel.calls(), vec![ChannelCall::Initialise]);

    app.stop().unwrap();
    assert!(project.wait_until_stopped(Duration::from_secs(5)));
    assert_eq!(
        channel.calls(),
        vec![ChannelCall::Initialise, ChannelCall::CleanUp]
    );
}

#[test]
fn start_failure_stops_what_was_started() {
    let good = Project::builder("good")
        .poll_interval(Duration::from_millis(5))
        .build();
    let unnamed = Project::new("", Vec::new());
    let server = Server::new(
        "local",
        vec![ServerItem::from(Arc::clone(&good)), ServerItem::from(unnamed)],
    );
    let channel = FakeChannel::new("socket");
    server.add_channel(Arc::new(channel.clone()));
    let app = Application::new().with_configuration(server);

    let err = app.start().unwrap_err();

    assert_eq!(err.to_string(), "Cannot start a project without a name");
    assert!(good.wait_until_stopped(Duration::from_secs(5)));
    assert_eq!(channel.calls(), vec![ChannelCall::CleanUp]);
}

#[test]
fn started_project_integrates_its_tasks_to_completion() {
    let (_, mut app) = application(
        "[server]\nname = \"local\"\n[[project]]\nname = \"core\"\npoll_interval_ms = 5\n[[project.task]]\nkind = \"comment\"\ntext = \"hello\"\n",
    );
    let server = app.load_configuration(Path::new(CONFIG_PATH)).unwrap();
    let project = server.list_projects().remove(0);

    app.start().unwrap();
    assert_eq!(project.state(), ProjectState::Running);

    let request = IntegrationRequest::new("manual", "core", &FakeClock::new());
    let status = project.integrate(&request).unwrap();

    assert_eq!(status, IntegrationStatus::Success);
    assert_eq!(project.tasks()[0].state(), TaskState::Completed);

    app.stop().unwrap();
    assert!(project.wait_until_stopped(Duration::from_secs(5)));
}
