// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hierarchical task execution context
//!
//! One context exists per running task. Children share the parent's writer
//! and modification sets; a failure recorded on a child is propagated to
//! every ancestor so the root carries the overall integration status.
//!
//! Completing the root ends the document and closes the writer. Repeated
//! root completions re-emit those two markers but never the summary.

use crate::build_log::{BuildLogError, LogWriter, NullLogWriter};
use crate::clock::{format_timestamp, Clock, SystemClock};
use crate::integration::IntegrationRequest;
use crate::modification::ModificationSet;
use crate::status::IntegrationStatus;
use crate::task::Task;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub type SharedLogWriter = Arc<Mutex<Box<dyn LogWriter>>>;

/// Inputs for a root context
pub struct TaskExecutionParameters {
    pub writer: Box<dyn LogWriter>,
    pub clock: Arc<dyn Clock>,
    pub request: Option<IntegrationRequest>,
    pub project: Option<String>,
}

impl Default for TaskExecutionParameters {
    fn default() -> Self {
        Self {
            writer: Box::new(NullLogWriter),
            clock: Arc::new(SystemClock),
            request: None,
            project: None,
        }
    }
}

pub struct TaskExecutionContext {
    parent: Option<Arc<TaskExecutionContext>>,
    writer: SharedLogWriter,
    clock: Arc<dyn Clock>,
    request: Option<IntegrationRequest>,
    project: Option<String>,
    modification_sets: Arc<Mutex<Vec<ModificationSet>>>,
    status: Mutex<IntegrationStatus>,
    completed: AtomicBool,
}

impl TaskExecutionContext {
    /// Create a root context
    pub fn new(parameters: TaskExecutionParameters) -> Arc<Self> {
        Arc::new(Self {
            parent: None,
            writer: Arc::new(Mutex::new(parameters.writer)),
            clock: parameters.clock,
            request: parameters.request,
            project: parameters.project,
            modification_sets: Arc::new(Mutex::new(Vec::new())),
            status: Mutex::new(IntegrationStatus::Success),
            completed: AtomicBool::new(false),
        })
    }

    pub fn parent(&self) -> Option<&Arc<TaskExecutionContext>> {
        self.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn request(&self) -> Option<&IntegrationRequest> {
        self.request.as_ref()
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Modification sets shared by the whole context tree
    pub fn modification_sets(&self) -> &Arc<Mutex<Vec<ModificationSet>>> {
        &self.modification_sets
    }

    pub fn add_modifications(&self, set: ModificationSet) {
        self.modification_sets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(set);
    }

    pub fn current_status(&self) -> IntegrationStatus {
        *self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record an outcome on this context and every ancestor
    pub fn record_status(&self, status: IntegrationStatus) {
        let mut current = Some(self);
        while let Some(context) = current {
            let mut slot = context.status.lock().unwrap_or_else(|e| e.into_inner());
            *slot = slot.worst(status);
            drop(slot);
            current = context.parent.as_deref();
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }

    /// Open a `task` element and return the context for that task
    pub fn start_child(self: &Arc<Self>, task: &Task) -> Result<Arc<Self>, BuildLogError> {
        {
            let mut writer = self.writer();
            writer.write_start_element("task")?;
            writer.write_attribute("name", task.name())?;
            writer.write_attribute("type", task.type_name())?;
            writer.write_element_string("start", &format_timestamp(self.clock.now()))?;
        }
        Ok(Arc::new(Self {
            parent: Some(Arc::clone(self)),
            writer: Arc::clone(&self.writer),
            clock: Arc::clone(&self.clock),
            request: self.request.clone(),
            project: self.project.clone(),
            modification_sets: Arc::clone(&self.modification_sets),
            status: Mutex::new(IntegrationStatus::Success),
            completed: AtomicBool::new(false),
        }))
    }

    /// Write a timestamped `entry` element
    pub fn add_entry_to_build_log(&self, message: &str) -> Result<(), BuildLogError> {
        let mut writer = self.writer();
        writer.write_start_element("entry")?;
        writer.write_attribute("time", &format_timestamp(self.clock.now()))?;
        writer.write_string(message)?;
        writer.write_end_element()
    }

    /// Finish this context.
    ///
    /// A child closes its `task` element once. The root writes its finish
    /// time and status the first time, then always ends the document and
    /// closes the writer, attempting both even when an earlier write failed.
    pub fn complete(&self) -> Result<(), BuildLogError> {
        let first = !self.completed.swap(true, Ordering::SeqCst);
        let mut writer = self.writer();

        if self.parent.is_some() {
            return if first { writer.write_end_element() } else { Ok(()) };
        }

        let summary = if first {
            let finish = format_timestamp(self.clock.now());
            let status = self.current_status();
            writer
                .write_element_string("finish", &finish)
                .and_then(|_| writer.write_element_string("status", status.as_str()))
        } else {
            Ok(())
        };
        let ended = writer.write_end_document();
        let closed = writer.close();
        summary.and(ended).and(closed)
    }

    fn writer(&self) -> std::sync::MutexGuard<'_, Box<dyn LogWriter>> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
