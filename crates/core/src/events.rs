// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project lifecycle events and the bus that fans them out
//!
//! Subscribers register name patterns:
//!   - Exact: "integration:completed"
//!   - Single wildcard: "project:*" matches "project:started", "project:stopped"
//!   - Everything: "*" or "**"

use crate::status::IntegrationStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Something observable happened to a project
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProjectEvent {
    Started { project: String },
    Stopping { project: String },
    Stopped { project: String },
    IntegrationStarted { project: String, source: String },
    IntegrationCompleted { project: String, status: IntegrationStatus },
    IntegrationCancelled { project: String, source: String },
}

impl ProjectEvent {
    /// Event name used for pattern matching
    pub fn name(&self) -> &'static str {
        match self {
            ProjectEvent::Started { .. } => "project:started",
            ProjectEvent::Stopping { .. } => "project:stopping",
            ProjectEvent::Stopped { .. } => "project:stopped",
            ProjectEvent::IntegrationStarted { .. } => "integration:started",
            ProjectEvent::IntegrationCompleted { .. } => "integration:completed",
            ProjectEvent::IntegrationCancelled { .. } => "integration:cancelled",
        }
    }

    pub fn project(&self) -> &str {
        match self {
            ProjectEvent::Started { project }
            | ProjectEvent::Stopping { project }
            | ProjectEvent::Stopped { project }
            | ProjectEvent::IntegrationStarted { project, .. }
            | ProjectEvent::IntegrationCompleted { project, .. }
            | ProjectEvent::IntegrationCancelled { project, .. } => project,
        }
    }
}

/// Pattern for matching event names segment by segment
#[derive(Clone, Debug)]
pub struct EventPattern(String);

impl EventPattern {
    pub fn new(pattern: &str) -> Self {
        Self(pattern.to_string())
    }

    pub fn matches(&self, event_name: &str) -> bool {
        if self.0.is_empty() {
            return false;
        }
        if self.0 == "*" || self.0 == "**" {
            return true;
        }
        let pattern: Vec<&str> = self.0.split(':').collect();
        let event: Vec<&str> = event_name.split(':').collect();
        Self::match_segments(&pattern, &event)
    }

    fn match_segments(pattern: &[&str], event: &[&str]) -> bool {
        match (pattern.first(), event.first()) {
            (None, None) => true,
            (Some(&"**"), _) => true,
            (Some(&"*"), Some(_)) => Self::match_segments(&pattern[1..], &event[1..]),
            (Some(p), Some(e)) if p == e => Self::match_segments(&pattern[1..], &event[1..]),
            _ => false,
        }
    }
}

/// Handle for unsubscribing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

pub type EventSender = mpsc::UnboundedSender<ProjectEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<ProjectEvent>;

/// Routes project events to matching subscribers
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<HashMap<SubscriberId, (Vec<EventPattern>, EventSender)>>>,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events matching any of the patterns
    pub fn subscribe(&self, patterns: &[&str]) -> (SubscriberId, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let patterns = patterns.iter().map(|p| EventPattern::new(p)).collect();
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, (patterns, tx));
        (id, rx)
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
    }

    /// Deliver an event to every matching subscriber.
    ///
    /// Subscribers whose receiver was dropped are pruned.
    pub fn publish(&self, event: ProjectEvent) {
        let name = event.name();
        let mut dead = Vec::new();
        {
            let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
            for (id, (patterns, tx)) in subs.iter() {
                if patterns.iter().any(|p| p.matches(name)) && tx.send(event.clone()).is_err() {
                    dead.push(*id);
                }
            }
        }
        if !dead.is_empty() {
            let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
            for id in dead {
                subs.remove(&id);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
