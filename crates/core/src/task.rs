// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task lifecycle
//!
//! A task is a node in a project's build tree. Its lifecycle is
//! `validate -> initialise -> run -> clean_up`, with the concrete work
//! supplied by a [`TaskBehaviour`]. Running is lazy: [`Task::run`] returns an
//! iterator that invokes the behaviour on first use and then yields the
//! child tasks one at a time, so the caller decides when (and whether) each
//! child runs.

use crate::build_log::BuildLogError;
use crate::context::TaskExecutionContext;
use crate::status::IntegrationStatus;
use crate::validation::ValidationLog;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// The state of a task
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TaskState {
    #[default]
    Unknown,
    Validated,
    Pending,
    Executing,
    Completed,
    Skipped,
    Terminated,
}

/// Errors raised while running a task
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task '{0}' has not been initialised")]
    NotInitialised(String),
    #[error("{0}")]
    Failed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("build log error: {0}")]
    BuildLog(#[from] BuildLogError),
}

impl TaskError {
    /// Outcome recorded against the integration for this error
    pub fn status(&self) -> IntegrationStatus {
        match self {
            TaskError::Failed(_) => IntegrationStatus::Failure,
            _ => IntegrationStatus::Error,
        }
    }
}

/// The work a concrete task kind performs
pub trait TaskBehaviour: Send + Sync {
    /// Short kind name written to the build log, e.g. `Comment`
    fn type_name(&self) -> &'static str;

    fn on_validate(&self, _log: &mut dyn ValidationLog) {}

    fn on_initialise(&self) {}

    /// Perform the task's own work, returning children to run in order
    fn on_run(&self, context: &Arc<TaskExecutionContext>) -> Result<Vec<Arc<Task>>, TaskError>;

    fn on_clean_up(&self) {}
}

/// Guard deciding whether a task should run
pub trait TaskCondition: Send + Sync {
    fn evaluate(&self, context: &TaskExecutionContext) -> bool;

    fn validate(&self, _log: &mut dyn ValidationLog) {}
}

pub struct Task {
    name: Option<String>,
    state: Mutex<TaskState>,
    conditions: Vec<Box<dyn TaskCondition>>,
    behaviour: Box<dyn TaskBehaviour>,
}

impl Task {
    pub fn new(behaviour: impl TaskBehaviour + 'static) -> Self {
        Self {
            name: None,
            state: Mutex::new(TaskState::Unknown),
            conditions: Vec::new(),
            behaviour: Box::new(behaviour),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn with_condition(mut self, condition: impl TaskCondition + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }

    /// Display name, falling back to the kind name
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.behaviour.type_name())
    }

    pub fn type_name(&self) -> &'static str {
        self.behaviour.type_name()
    }

    pub fn state(&self) -> TaskState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn conditions(&self) -> &[Box<dyn TaskCondition>] {
        &self.conditions
    }

    fn set_state(&self, state: TaskState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    pub fn validate(&self, log: &mut dyn ValidationLog) {
        self.set_state(TaskState::Validated);
        self.behaviour.on_validate(log);
        for condition in &self.conditions {
            condition.validate(log);
        }
    }

    pub fn initialise(&self) {
        self.behaviour.on_initialise();
        self.set_state(TaskState::Pending);
    }

    /// Whether every condition passes, evaluated in order and short-circuiting
    pub fn can_run(&self, context: &TaskExecutionContext) -> bool {
        self.conditions.iter().all(|c| c.evaluate(context))
    }

    pub fn skip(&self) {
        self.set_state(TaskState::Skipped);
    }

    /// Lazily run the task. Nothing happens until the iterator is advanced.
    pub fn run(&self, context: &Arc<TaskExecutionContext>) -> TaskRun<'_> {
        TaskRun {
            task: self,
            context: Arc::clone(context),
            stage: RunStage::NotStarted,
        }
    }

    /// Settle the final state: pending tasks were skipped and executing
    /// tasks were cut short.
    pub fn clean_up(&self) {
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            *state = match *state {
                TaskState::Pending => TaskState::Skipped,
                TaskState::Executing => TaskState::Terminated,
                other => other,
            };
        }
        self.behaviour.on_clean_up();
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name())
            .field("type", &self.type_name())
            .field("state", &self.state())
            .finish()
    }
}

enum RunStage {
    NotStarted,
    Yielding(std::vec::IntoIter<Arc<Task>>),
    Finished,
}

/// Iterator over the children of a running task.
///
/// The first call to `next` moves the task to `Executing` and invokes its
/// behaviour. A behaviour error is yielded once and leaves the task
/// `Executing`. The task becomes `Completed` when the children are exhausted.
pub struct TaskRun<'a> {
    task: &'a Task,
    context: Arc<TaskExecutionContext>,
    stage: RunStage,
}

impl Iterator for TaskRun<'_> {
    type Item = Result<Arc<Task>, TaskError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.stage {
                RunStage::NotStarted => {
                    if self.task.state() != TaskState::Pending {
                        self.stage = RunStage::Finished;
                        return Some(Err(TaskError::NotInitialised(self.task.name().to_string())));
                    }
                    self.task.set_state(TaskState::Executing);
                    match self.task.behaviour.on_run(&self.context) {
                        Ok(children) => self.stage = RunStage::Yielding(children.into_iter()),
                        Err(error) => {
                            self.stage = RunStage::Finished;
                            return Some(Err(error));
                        }
                    }
                }
                RunStage::Yielding(children) => {
                    if let Some(child) = children.next() {
                        return Some(Ok(child));
                    }
                    self.task.set_state(TaskState::Completed);
                    self.stage = RunStage::Finished;
                }
                RunStage::Finished => return None,
            }
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
