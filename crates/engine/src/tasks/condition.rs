// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use ccnet_core::{IntegrationStatus, TaskCondition, TaskExecutionContext};

/// Passes when the current integration status does (or does not) equal a value
#[derive(Debug, Clone, Copy)]
pub struct StatusCondition {
    status: IntegrationStatus,
    negate: bool,
}

impl StatusCondition {
    pub fn equals(status: IntegrationStatus) -> Self {
        Self {
            status,
            negate: false,
        }
    }

    pub fn not_equals(status: IntegrationStatus) -> Self {
        Self {
            status,
            negate: true,
        }
    }
}

impl TaskCondition for StatusCondition {
    fn evaluate(&self, context: &TaskExecutionContext) -> bool {
        (context.current_status() == self.status) != self.negate
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
