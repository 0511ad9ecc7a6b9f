// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use ccnet_core::{Task, TaskBehaviour, TaskError, TaskExecutionContext, ValidationLog};
use std::sync::Arc;

/// Hands its children back to the caller to run in order
pub struct Sequential {
    children: Vec<Arc<Task>>,
}

impl Sequential {
    pub fn new(children: Vec<Arc<Task>>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Arc<Task>] {
        &self.children
    }
}

impl TaskBehaviour for Sequential {
    fn type_name(&self) -> &'static str {
        "Sequential"
    }

    fn on_validate(&self, log: &mut dyn ValidationLog) {
        if self.children.is_empty() {
            log.add_warning("A {0} task has no children", &[self.type_name()]);
        }
        for child in &self.children {
            child.validate(log);
        }
    }

    fn on_run(&self, _context: &Arc<TaskExecutionContext>) -> Result<Vec<Arc<Task>>, TaskError> {
        Ok(self.children.clone())
    }
}

#[cfg(test)]
#[path = "sequential_tests.rs"]
mod tests;
