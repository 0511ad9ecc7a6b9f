// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project, task, trigger and condition definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

/// A project definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDef {
    #[serde(default)]
    pub name: String,
    /// How often the project thread checks its triggers
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default, rename = "trigger")]
    pub triggers: Vec<TriggerDef>,
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskDef>,
}

impl ProjectDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            triggers: Vec::new(),
            tasks: Vec::new(),
        }
    }
}

/// A task in a project's build tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TaskDef {
    /// Writes its text to the build log
    Comment {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        text: String,
        #[serde(default, rename = "condition")]
        conditions: Vec<ConditionDef>,
    },
    /// Runs an external program
    Exec {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        executable: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        working_dir: Option<PathBuf>,
        #[serde(default, rename = "condition")]
        conditions: Vec<ConditionDef>,
    },
    /// Runs nested tasks in order
    Sequential {
        #[serde(default)]
        name: Option<String>,
        #[serde(default, rename = "task")]
        tasks: Vec<TaskDef>,
        #[serde(default, rename = "condition")]
        conditions: Vec<ConditionDef>,
    },
}

impl TaskDef {
    pub fn name(&self) -> Option<&str> {
        match self {
            TaskDef::Comment { name, .. }
            | TaskDef::Exec { name, .. }
            | TaskDef::Sequential { name, .. } => name.as_deref(),
        }
    }

    pub fn conditions(&self) -> &[ConditionDef] {
        match self {
            TaskDef::Comment { conditions, .. }
            | TaskDef::Exec { conditions, .. }
            | TaskDef::Sequential { conditions, .. } => conditions,
        }
    }
}

/// What causes a project to request an integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TriggerDef {
    Interval { seconds: u64 },
}

/// A guard on whether a task runs, evaluated against the current status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ConditionDef {
    Status { status: String },
    NotStatus { status: String },
}
