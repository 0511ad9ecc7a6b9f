// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integration triggers

use ccnet_core::{Clock, IntegrationRequest, ValidationLog};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Decides when a project should request an integration
pub trait Trigger: Send + Sync {
    fn name(&self) -> &str;

    fn initialise(&self) {}

    /// A request when the trigger has fired, otherwise `None`
    fn check(&self, project: &str) -> Option<IntegrationRequest>;

    /// Re-arm after the request was handled
    fn reset(&self) {}

    fn clean_up(&self) {}

    fn validate(&self, _log: &mut dyn ValidationLog) {}
}

/// Fires once every `period`, measured from initialisation or the last reset
pub struct IntervalTrigger {
    period: Duration,
    clock: Arc<dyn Clock>,
    next_fire: Mutex<Option<DateTime<Utc>>>,
}

impl IntervalTrigger {
    pub fn new(period: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            period,
            clock,
            next_fire: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// When the trigger will next fire, if armed
    pub fn next_fire(&self) -> Option<DateTime<Utc>> {
        *self.next_fire.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn arm(&self) {
        let step = chrono::Duration::from_std(self.period).unwrap_or_else(|_| chrono::Duration::zero());
        let now = self.clock.now();
        *self.next_fire.lock().unwrap_or_else(|e| e.into_inner()) =
            Some(now.checked_add_signed(step).unwrap_or(now));
    }
}

impl Trigger for IntervalTrigger {
    fn name(&self) -> &str {
        "interval"
    }

    fn initialise(&self) {
        self.arm();
    }

    fn check(&self, project: &str) -> Option<IntegrationRequest> {
        let mut next_fire = self.next_fire.lock().unwrap_or_else(|e| e.into_inner());
        let due = (*next_fire)?;
        if self.clock.now() < due {
            return None;
        }
        *next_fire = None;
        Some(IntegrationRequest::new(self.name(), project, self.clock.as_ref()))
    }

    fn reset(&self) {
        self.arm();
    }

    fn clean_up(&self) {
        *self.next_fire.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn validate(&self, log: &mut dyn ValidationLog) {
        if self.period.is_zero() {
            log.add_error("The {0} trigger requires a period greater than zero", &[self.name()]);
        }
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
