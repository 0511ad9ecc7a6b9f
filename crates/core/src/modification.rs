// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source changes detected for an integration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One changed file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    pub path: String,
    /// e.g. `added`, `modified`, `deleted`
    pub change_type: String,
    pub user: Option<String>,
    pub comment: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// Changes reported by one source control block
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModificationSet {
    pub source: String,
    pub modifications: Vec<Modification>,
}

impl ModificationSet {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            modifications: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modifications.is_empty()
    }
}
