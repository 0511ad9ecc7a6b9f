// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted project state
//!
//! Layout under the state root:
//!   <project>/project.state   latest [`ProjectState`] as JSON
//!   <project>/history.jsonl   every [`IntegrationSummary`], one per line
//!
//! The state file is rewritten atomically. When it is missing the state is
//! rebuilt from the history log.

use crate::history::IntegrationHistory;
use ccnet_core::IntegrationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const STATE_FILE: &str = "project.state";
const HISTORY_FILE: &str = "history.jsonl";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of one completed integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationSummary {
    pub start_time: DateTime<Utc>,
    pub finish_time: DateTime<Utc>,
    pub status: IntegrationStatus,
}

/// What a project remembers between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectState {
    pub last_integration: Option<IntegrationSummary>,
    pub total_integrations: u64,
}

impl ProjectState {
    pub fn apply(&mut self, summary: IntegrationSummary) {
        self.total_integrations += 1;
        self.last_integration = Some(summary);
    }

    /// Rebuild state from a replayed history
    pub fn from_history(summaries: Vec<IntegrationSummary>) -> Self {
        let mut state = Self::default();
        for summary in summaries {
            state.apply(summary);
        }
        state
    }
}

/// File-backed store for project state
#[derive(Debug, Clone)]
pub struct StateStore {
    root: PathBuf,
}

impl StateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one project's files
    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.root.join(sanitize(project))
    }

    /// Load a project's state, defaulting when nothing was recorded yet
    pub fn load(&self, project: &str) -> Result<ProjectState, StorageError> {
        let dir = self.project_dir(project);
        match std::fs::read_to_string(dir.join(STATE_FILE)) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let summaries = IntegrationHistory::replay(&dir.join(HISTORY_FILE))?;
                Ok(ProjectState::from_history(summaries))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Atomically replace a project's state file
    pub fn save(&self, project: &str, state: &ProjectState) -> Result<(), StorageError> {
        let dir = self.project_dir(project);
        std::fs::create_dir_all(&dir)?;
        let tmp = dir.join(format!("{}.tmp", STATE_FILE));
        std::fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
        std::fs::rename(&tmp, dir.join(STATE_FILE))?;
        Ok(())
    }

    /// Append a summary to the history and fold it into the saved state
    pub fn record(
        &self,
        project: &str,
        state: &mut ProjectState,
        summary: IntegrationSummary,
    ) -> Result<(), StorageError> {
        let dir = self.project_dir(project);
        std::fs::create_dir_all(&dir)?;
        let mut history = IntegrationHistory::open(&dir.join(HISTORY_FILE))?;
        history.append(&summary)?;
        state.apply(summary);
        self.save(project, state)?;
        tracing::debug!(
            project,
            total = state.total_integrations,
            "recorded integration summary"
        );
        Ok(())
    }

    /// Every recorded summary for a project, oldest first
    pub fn history(&self, project: &str) -> Result<Vec<IntegrationSummary>, StorageError> {
        IntegrationHistory::replay(&self.project_dir(project).join(HISTORY_FILE))
    }
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        format!("_{}", cleaned)
    } else {
        cleaned
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
