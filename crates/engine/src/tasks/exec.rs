// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External process task

use ccnet_core::{Task, TaskBehaviour, TaskError, TaskExecutionContext, ValidationLog};
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

/// Runs a program, logging each output line as a build log entry.
///
/// A non-zero exit is a task failure.
#[derive(Debug, Clone)]
pub struct Exec {
    executable: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl Exec {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl TaskBehaviour for Exec {
    fn type_name(&self) -> &'static str {
        "Exec"
    }

    fn on_validate(&self, log: &mut dyn ValidationLog) {
        if self.executable.trim().is_empty() {
            log.add_error("An {0} task requires an executable", &[self.type_name()]);
        }
    }

    fn on_run(&self, context: &Arc<TaskExecutionContext>) -> Result<Vec<Arc<Task>>, TaskError> {
        let mut command = Command::new(&self.executable);
        command.args(&self.args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        tracing::info!(executable = %self.executable, args = ?self.args, "running process");
        let output = command.output()?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            context.add_entry_to_build_log(line)?;
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            context.add_entry_to_build_log(line)?;
        }

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            return Err(TaskError::Failed(format!(
                "'{}' exited with code {}",
                self.executable, code
            )));
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
