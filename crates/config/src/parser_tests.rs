// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{ChannelDef, ConditionDef, TaskDef, TriggerDef, DEFAULT_POLL_INTERVAL_MS};
use yare::parameterized;

const SAMPLE_CONFIG: &str = r#"
[server]
name = "local"

[[server.channel]]
kind = "socket"
path = "/tmp/ccnet.sock"

[daemon]
state_dir = "/var/lib/ccnet"

[[queue]]
name = "Builds"
allowed_active = 2

[[queue.project]]
name = "core"

[[queue.project.task]]
kind = "comment"
text = "Building core"

[[queue.queue]]
name = "Nightly"

[[queue.queue.project]]
name = "docs"

[[project]]
name = "tools"
poll_interval_ms = 250

[[project.trigger]]
kind = "interval"
seconds = 60

[[project.task]]
kind = "exec"
name = "compile"
executable = "make"
args = ["all"]

[[project.task]]
kind = "sequential"
name = "report"

[[project.task.task]]
kind = "comment"
text = "Build failed"

[[project.task.task.condition]]
kind = "status"
status = "Failure"

[[project.task.condition]]
kind = "not-status"
status = "Error"
"#;

#[test]
fn parses_server_and_channels() {
    let config = parse_config(SAMPLE_CONFIG).unwrap();
    assert_eq!(config.server.name, "local");
    assert_eq!(
        config.server.channels,
        vec![ChannelDef::Socket {
            path: Some("/tmp/ccnet.sock".into())
        }]
    );
    assert_eq!(config.daemon.state_dir, Some("/var/lib/ccnet".into()));
}

#[test]
fn parses_nested_queues() {
    let config = parse_config(SAMPLE_CONFIG).unwrap();
    let queue = &config.queues[0];
    assert_eq!(queue.name, "Builds");
    assert_eq!(queue.allowed_active, 2);
    assert_eq!(queue.projects[0].name, "core");
    assert_eq!(queue.queues[0].name, "Nightly");
    assert_eq!(queue.queues[0].allowed_active, 1);
}

#[test]
fn parses_project_tasks_and_triggers() {
    let config = parse_config(SAMPLE_CONFIG).unwrap();
    let project = &config.projects[0];
    assert_eq!(project.poll_interval_ms, 250);
    assert_eq!(project.triggers, vec![TriggerDef::Interval { seconds: 60 }]);

    match &project.tasks[0] {
        TaskDef::Exec {
            executable, args, ..
        } => {
            assert_eq!(executable, "make");
            assert_eq!(args, &vec!["all".to_string()]);
        }
        other => panic!("expected exec task, got {:?}", other),
    }

    let report = &project.tasks[1];
    assert_eq!(report.name(), Some("report"));
    assert_eq!(
        report.conditions(),
        &[ConditionDef::NotStatus {
            status: "Error".into()
        }]
    );
    match report {
        TaskDef::Sequential { tasks, .. } => {
            assert_eq!(tasks.len(), 1);
            assert_eq!(
                tasks[0].conditions(),
                &[ConditionDef::Status {
                    status: "Failure".into()
                }]
            );
        }
        other => panic!("expected sequential task, got {:?}", other),
    }
}

#[test]
fn poll_interval_defaults() {
    let config = parse_config("[[project]]\nname = \"p\"\n").unwrap();
    assert_eq!(config.projects[0].poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
}

#[test]
fn empty_config_is_valid() {
    let config = parse_config("").unwrap();
    assert_eq!(config, ConfigDef::default());
}

#[test]
fn project_names_include_nested_projects() {
    let config = parse_config(SAMPLE_CONFIG).unwrap();
    assert_eq!(config.project_names(), vec!["core", "docs", "tools"]);
}

#[parameterized(
    unknown_task_kind = { "[[project]]\nname = \"p\"\n[[project.task]]\nkind = \"deploy\"\n" },
    unknown_trigger_kind = { "[[project]]\nname = \"p\"\n[[project.trigger]]\nkind = \"cron\"\n" },
    trigger_missing_seconds = { "[[project]]\nname = \"p\"\n[[project.trigger]]\nkind = \"interval\"\n" },
    bad_toml = { "[[project]\n" },
)]
fn rejects_malformed_config(content: &str) {
    assert!(matches!(parse_config(content), Err(ConfigError::Toml(_))));
}

#[test]
fn rejects_zero_allowed_active() {
    let err = parse_config("[[queue]]\nname = \"q\"\nallowed_active = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidFormat(_)));
}

#[test]
fn load_reports_missing_file_path() {
    let err = load_config(Path::new("/nonexistent/ccnet.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/ccnet.toml"));
}
