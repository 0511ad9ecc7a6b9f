// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ccnet_core::{
    CollectingValidationLog, IntegrationStatus, RecordingLogWriter, TaskExecutionParameters,
    TaskState, WriterCall,
};

fn context() -> (RecordingLogWriter, Arc<TaskExecutionContext>) {
    let recorder = RecordingLogWriter::new();
    let context = TaskExecutionContext::new(TaskExecutionParameters {
        writer: Box::new(recorder.clone()),
        ..TaskExecutionParameters::default()
    });
    (recorder, context)
}

#[test]
fn output_lines_become_entries() {
    let (recorder, context) = context();
    let task = Task::new(Exec::new("sh").with_args(["-c", "echo one; echo two"]));
    task.initialise();

    assert_eq!(task.run(&context).count(), 0);

    let calls = recorder.calls();
    assert!(calls.contains(&WriterCall::String("one".into())));
    assert!(calls.contains(&WriterCall::String("two".into())));
    assert_eq!(task.state(), TaskState::Completed);
}

#[test]
fn non_zero_exit_fails_the_task() {
    let (_, context) = context();
    let task = Task::new(Exec::new("sh").with_args(["-c", "exit 3"]));
    task.initialise();

    let err = task.run(&context).next().unwrap().unwrap_err();

    assert_eq!(err.to_string(), "'sh' exited with code 3");
    assert_eq!(err.status(), IntegrationStatus::Failure);
    assert_eq!(task.state(), TaskState::Executing);
}

#[test]
fn missing_program_is_an_io_error() {
    let (_, context) = context();
    let task = Task::new(Exec::new("/nonexistent/ccnet-test-binary"));
    task.initialise();

    let err = task.run(&context).next().unwrap().unwrap_err();

    assert!(matches!(err, TaskError::Io(_)));
    assert_eq!(err.status(), IntegrationStatus::Error);
}

#[test]
fn runs_in_working_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "").unwrap();
    let (recorder, context) = context();
    let task = Task::new(Exec::new("ls").with_working_dir(dir.path()));
    task.initialise();

    assert_eq!(task.run(&context).count(), 0);
    assert!(recorder
        .calls()
        .contains(&WriterCall::String("marker.txt".into())));
}

#[test]
fn blank_executable_is_a_validation_error() {
    let mut log = CollectingValidationLog::new();
    Task::new(Exec::new(" ")).validate(&mut log);
    assert_eq!(log.number_of_errors(), 1);
}
