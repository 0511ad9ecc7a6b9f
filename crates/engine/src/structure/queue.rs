// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queues limit how many of their items integrate at once

use super::{report_duplicates, validate_name, IntegrationHost, Links, ServerItem};
use crate::project::Project;
use ccnet_core::{IntegrationContext, ValidationLog};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use uuid::Uuid;

#[derive(Default)]
struct Requests {
    active: Vec<Arc<IntegrationContext>>,
    pending: VecDeque<Arc<IntegrationContext>>,
}

/// Grants up to `allowed_active` integrations at a time, first come first served.
///
/// A queue nested in another queue forwards each request it grants to its own
/// host, so a request only proceeds once every queue above it agrees.
pub struct Queue {
    name: String,
    allowed_active: usize,
    children: Mutex<Vec<ServerItem>>,
    requests: Mutex<Requests>,
    links: Links,
    this: Weak<Queue>,
}

impl Queue {
    pub fn new(name: impl Into<String>, children: Vec<ServerItem>) -> Arc<Self> {
        Self::with_allowed_active(name, 1, children)
    }

    pub fn with_allowed_active(
        name: impl Into<String>,
        allowed_active: usize,
        children: Vec<ServerItem>,
    ) -> Arc<Self> {
        let queue = Arc::new_cyclic(|this: &Weak<Queue>| Self {
            name: name.into(),
            allowed_active: allowed_active.max(1),
            children: Mutex::new(Vec::new()),
            requests: Mutex::new(Requests::default()),
            links: Links::default(),
            this: this.clone(),
        });
        for child in children {
            queue.add_child(child);
        }
        queue
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn allowed_active(&self) -> usize {
        self.allowed_active
    }

    pub fn children(&self) -> Vec<ServerItem> {
        self.children
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn add_child(&self, child: ServerItem) {
        let host: Weak<dyn IntegrationHost> = self.this.clone();
        child.set_host(Some(host));
        if let Some(server) = self.links.server() {
            child.set_server(Arc::downgrade(&server));
        }
        self.children
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(child);
    }

    /// Detach the first child called `name`
    pub fn remove_child(&self, name: &str) -> Option<ServerItem> {
        let mut children = self.children.lock().unwrap_or_else(|e| e.into_inner());
        let index = children.iter().position(|c| c.name() == name)?;
        let child = children.remove(index);
        child.set_host(None);
        child.set_server(Weak::new());
        Some(child)
    }

    pub fn list_projects(&self) -> Vec<Arc<Project>> {
        self.children()
            .iter()
            .flat_map(ServerItem::list_projects)
            .collect()
    }

    pub fn validate(&self, log: &mut dyn ValidationLog) {
        validate_name(&self.name, "Queue", log);
        let children = self.children();
        for child in &children {
            child.validate(log);
        }
        report_duplicates(children.iter().map(ServerItem::name), "child", log);
    }

    /// Requests currently holding a slot
    pub fn active_requests(&self) -> Vec<Arc<IntegrationContext>> {
        self.requests().active.clone()
    }

    /// Requests waiting for a slot, oldest first
    pub fn pending_requests(&self) -> Vec<Arc<IntegrationContext>> {
        self.requests().pending.iter().cloned().collect()
    }

    pub(crate) fn links(&self) -> &Links {
        &self.links
    }

    fn requests(&self) -> MutexGuard<'_, Requests> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn watch(&self, context: &IntegrationContext) {
        let queue = self.this.clone();
        context.on_completed(move |ctx| {
            if let Some(queue) = queue.upgrade() {
                queue.finished(ctx.id());
            }
        });
    }

    /// Pass a granted request up to our own host
    fn forward(&self, context: &Arc<IntegrationContext>) -> bool {
        match self.links.host() {
            Some(host) => host.ask_to_integrate(context),
            None => true,
        }
    }

    fn finished(&self, id: Uuid) {
        let promoted = {
            let mut requests = self.requests();
            requests.active.retain(|c| c.id() != id);
            requests.pending.retain(|c| c.id() != id);

            let mut promoted = Vec::new();
            while requests.active.len() < self.allowed_active {
                let Some(next) = requests.pending.pop_front() else {
                    break;
                };
                requests.active.push(Arc::clone(&next));
                promoted.push(next);
            }
            promoted
        };

        for next in promoted {
            tracing::debug!(queue = %self.name, item = next.item(), "promoting pending request");
            if self.forward(&next) {
                next.release();
            }
        }
    }
}

impl IntegrationHost for Queue {
    fn name(&self) -> &str {
        &self.name
    }

    fn qualified_name(&self) -> String {
        self.links.qualified_name(&self.name)
    }

    fn ask_to_integrate(&self, context: &Arc<IntegrationContext>) -> bool {
        let granted = {
            let mut requests = self.requests();
            if requests.active.len() < self.allowed_active {
                requests.active.push(Arc::clone(context));
                true
            } else {
                requests.pending.push_back(Arc::clone(context));
                context.lock();
                false
            }
        };
        self.watch(context);

        tracing::debug!(
            queue = %self.name,
            item = context.item(),
            granted,
            "integration requested"
        );
        if granted {
            self.forward(context)
        } else {
            false
        }
    }
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("name", &self.name)
            .field("allowed_active", &self.allowed_active)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
