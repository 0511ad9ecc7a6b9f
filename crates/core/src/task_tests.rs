// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::context::TaskExecutionParameters;
use crate::validation::CollectingValidationLog;
use std::sync::atomic::{AtomicUsize, Ordering};
use yare::parameterized;

/// Behaviour that records hook calls and can be told to fail
#[derive(Clone, Default)]
struct Probe {
    runs: Arc<AtomicUsize>,
    cleanups: Arc<AtomicUsize>,
    observed: Arc<Mutex<Option<TaskState>>>,
    owner: Arc<Mutex<Option<std::sync::Weak<Task>>>>,
    children: Vec<Arc<Task>>,
    fail: bool,
}

impl TaskBehaviour for Probe {
    fn type_name(&self) -> &'static str {
        "Probe"
    }

    fn on_validate(&self, log: &mut dyn ValidationLog) {
        log.add_warning("probe validated", &[]);
    }

    fn on_run(&self, _context: &Arc<TaskExecutionContext>) -> Result<Vec<Arc<Task>>, TaskError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let owner = self.owner.lock().unwrap().as_ref().and_then(|w| w.upgrade());
        *self.observed.lock().unwrap() = owner.map(|t| t.state());
        if self.fail {
            return Err(TaskError::Failed("probe failed".into()));
        }
        Ok(self.children.clone())
    }

    fn on_clean_up(&self) {
        self.cleanups.fetch_add(1, Ordering::SeqCst);
    }
}

fn probe_task(probe: Probe) -> Arc<Task> {
    let owner = Arc::clone(&probe.owner);
    let task = Arc::new(Task::new(probe));
    *owner.lock().unwrap() = Some(Arc::downgrade(&task));
    task
}

struct Fixed(bool, Arc<AtomicUsize>);

impl TaskCondition for Fixed {
    fn evaluate(&self, _context: &TaskExecutionContext) -> bool {
        self.1.fetch_add(1, Ordering::SeqCst);
        self.0
    }

    fn validate(&self, log: &mut dyn ValidationLog) {
        log.add_error("condition validated", &[]);
    }
}

fn context() -> Arc<TaskExecutionContext> {
    TaskExecutionContext::new(TaskExecutionParameters::default())
}

#[test]
fn new_task_state_is_unknown() {
    let task = Task::new(Probe::default());
    assert_eq!(task.state(), TaskState::Unknown);
}

#[test]
fn name_falls_back_to_type_name() {
    let task = Task::new(Probe::default());
    assert_eq!(task.name(), "Probe");
    let named = Task::new(Probe::default()).with_name("Custom");
    assert_eq!(named.name(), "Custom");
    assert_eq!(named.type_name(), "Probe");
}

#[test]
fn validate_sets_validated_and_checks_conditions() {
    let evaluations = Arc::new(AtomicUsize::new(0));
    let task = Task::new(Probe::default()).with_condition(Fixed(true, evaluations));
    let mut log = CollectingValidationLog::new();
    task.validate(&mut log);
    assert_eq!(task.state(), TaskState::Validated);
    assert_eq!(log.number_of_warnings(), 1);
    assert_eq!(log.number_of_errors(), 1);
}

#[test]
fn initialise_sets_pending() {
    let task = Task::new(Probe::default());
    task.initialise();
    assert_eq!(task.state(), TaskState::Pending);
}

#[test]
fn run_is_lazy() {
    let probe = Probe::default();
    let runs = Arc::clone(&probe.runs);
    let task = probe_task(probe);
    task.initialise();
    let context = context();
    let run = task.run(&context);
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    assert_eq!(task.state(), TaskState::Pending);
    drop(run);
}

#[test]
fn run_sets_executing_during_hook_then_completed() {
    let probe = Probe::default();
    let observed = Arc::clone(&probe.observed);
    let task = probe_task(probe);
    task.initialise();
    let context = context();
    assert_eq!(task.run(&context).count(), 0);
    assert_eq!(*observed.lock().unwrap(), Some(TaskState::Executing));
    assert_eq!(task.state(), TaskState::Completed);
}

#[test]
fn run_yields_children_without_running_them() {
    let child_probe = Probe::default();
    let child_runs = Arc::clone(&child_probe.runs);
    let child = probe_task(child_probe);
    let parent = probe_task(Probe {
        children: vec![Arc::clone(&child)],
        ..Probe::default()
    });
    parent.initialise();
    let context = context();

    let mut run = parent.run(&context);
    let yielded = run.next().unwrap().unwrap();
    assert!(Arc::ptr_eq(&yielded, &child));
    assert_eq!(child_runs.load(Ordering::SeqCst), 0);
    assert_eq!(parent.state(), TaskState::Executing);

    assert!(run.next().is_none());
    assert_eq!(parent.state(), TaskState::Completed);
    assert_eq!(child.state(), TaskState::Unknown);
}

#[test]
fn failing_hook_leaves_task_executing_until_clean_up() {
    let task = probe_task(Probe {
        fail: true,
        ..Probe::default()
    });
    task.initialise();
    let context = context();

    let mut run = task.run(&context);
    let err = run.next().unwrap().unwrap_err();
    assert!(matches!(err, TaskError::Failed(_)));
    assert!(run.next().is_none());
    assert_eq!(task.state(), TaskState::Executing);

    task.clean_up();
    assert_eq!(task.state(), TaskState::Terminated);
}

#[test]
fn run_without_initialise_reports_error() {
    let task = Task::new(Probe::default()).with_name("Raw");
    let context = context();
    let mut run = task.run(&context);
    let err = run.next().unwrap().unwrap_err();
    assert_eq!(err.to_string(), "task 'Raw' has not been initialised");
    assert_eq!(task.state(), TaskState::Unknown);
}

#[test]
fn can_run_short_circuits_in_order() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let task = Task::new(Probe::default())
        .with_condition(Fixed(false, Arc::clone(&first)))
        .with_condition(Fixed(true, Arc::clone(&second)));
    assert!(!task.can_run(&context()));
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 0);
}

#[test]
fn can_run_without_conditions() {
    let task = Task::new(Probe::default());
    assert!(task.can_run(&context()));
}

#[test]
fn skip_sets_skipped() {
    let task = Task::new(Probe::default());
    task.initialise();
    task.skip();
    assert_eq!(task.state(), TaskState::Skipped);
}

#[parameterized(
    pending_becomes_skipped = { TaskState::Pending, TaskState::Skipped },
    executing_becomes_terminated = { TaskState::Executing, TaskState::Terminated },
    completed_unchanged = { TaskState::Completed, TaskState::Completed },
    skipped_unchanged = { TaskState::Skipped, TaskState::Skipped },
    unknown_unchanged = { TaskState::Unknown, TaskState::Unknown },
)]
fn clean_up_settles_state(initial: TaskState, expected: TaskState) {
    let probe = Probe::default();
    let cleanups = Arc::clone(&probe.cleanups);
    let task = Task::new(probe);
    task.set_state(initial);
    task.clean_up();
    assert_eq!(task.state(), expected);
    assert_eq!(cleanups.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_error_maps_to_failure_status() {
    assert_eq!(TaskError::Failed("x".into()).status(), IntegrationStatus::Failure);
    assert_eq!(
        TaskError::NotInitialised("x".into()).status(),
        IntegrationStatus::Error
    );
}
