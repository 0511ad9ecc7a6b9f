// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integration outcome

use serde::{Deserialize, Serialize};

/// Overall result of an integration, or of one task within it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegrationStatus {
    #[default]
    Unknown,
    Success,
    Failure,
    Error,
    Cancelled,
}

impl IntegrationStatus {
    fn severity(self) -> u8 {
        match self {
            IntegrationStatus::Unknown => 0,
            IntegrationStatus::Success => 1,
            IntegrationStatus::Cancelled => 2,
            IntegrationStatus::Failure => 3,
            IntegrationStatus::Error => 4,
        }
    }

    /// The more severe of two statuses
    pub fn worst(self, other: IntegrationStatus) -> IntegrationStatus {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationStatus::Unknown => "Unknown",
            IntegrationStatus::Success => "Success",
            IntegrationStatus::Failure => "Failure",
            IntegrationStatus::Error => "Error",
            IntegrationStatus::Cancelled => "Cancelled",
        }
    }

    /// Parse a status name, ignoring case
    pub fn parse(value: &str) -> Option<IntegrationStatus> {
        [
            IntegrationStatus::Unknown,
            IntegrationStatus::Success,
            IntegrationStatus::Failure,
            IntegrationStatus::Error,
            IntegrationStatus::Cancelled,
        ]
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for IntegrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
