// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::tasks::Comment;
use ccnet_core::{CollectingValidationLog, TaskExecutionParameters, TaskState};

#[test]
fn run_yields_children_in_order_without_running_them() {
    let first = Arc::new(Task::new(Comment::new("one")));
    let second = Arc::new(Task::new(Comment::new("two")));
    let task = Task::new(Sequential::new(vec![Arc::clone(&first), Arc::clone(&second)]));
    task.initialise();
    let context = TaskExecutionContext::new(TaskExecutionParameters::default());

    let children: Vec<_> = task.run(&context).map(|c| c.unwrap()).collect();

    assert_eq!(children.len(), 2);
    assert!(Arc::ptr_eq(&children[0], &first));
    assert!(Arc::ptr_eq(&children[1], &second));
    assert_eq!(first.state(), TaskState::Unknown);
    assert_eq!(task.state(), TaskState::Completed);
}

#[test]
fn validate_reaches_children() {
    let child = Arc::new(Task::new(Comment::new("")));
    let task = Task::new(Sequential::new(vec![Arc::clone(&child)]));
    let mut log = CollectingValidationLog::new();

    task.validate(&mut log);

    assert_eq!(child.state(), TaskState::Validated);
    assert_eq!(log.number_of_warnings(), 1);
}

#[test]
fn empty_sequence_is_a_warning() {
    let mut log = CollectingValidationLog::new();
    Task::new(Sequential::new(Vec::new())).validate(&mut log);
    assert_eq!(log.number_of_warnings(), 1);
}
