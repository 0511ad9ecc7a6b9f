// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use ccnet_core::{Task, TaskBehaviour, TaskError, TaskExecutionContext, ValidationLog};
use std::sync::Arc;

/// Writes a fixed message to the build log
#[derive(Debug, Clone)]
pub struct Comment {
    text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl TaskBehaviour for Comment {
    fn type_name(&self) -> &'static str {
        "Comment"
    }

    fn on_validate(&self, log: &mut dyn ValidationLog) {
        if self.text.is_empty() {
            log.add_warning("A {0} task has no text", &[self.type_name()]);
        }
    }

    fn on_run(&self, context: &Arc<TaskExecutionContext>) -> Result<Vec<Arc<Task>>, TaskError> {
        context.add_entry_to_build_log(&self.text)?;
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "comment_tests.rs"]
mod tests;
