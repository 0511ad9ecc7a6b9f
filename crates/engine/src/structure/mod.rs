// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The server structure tree
//!
//! A [`Server`] owns a list of [`ServerItem`]s. Items are either projects or
//! queues, and queues nest. Children hold weak back-references to their host
//! (used to arbitrate integrations) and to the owning server (used for
//! universal names). Back-references are replaced whenever a child is added
//! or removed.

mod queue;
mod server;

pub use queue::Queue;
pub use server::{Located, Server};

use crate::project::Project;
use ccnet_core::{IntegrationContext, ValidationLog};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

/// Prefix for every universal name
pub const URN_PREFIX: &str = "urn:ccnet:";

/// Something that decides when a child may integrate
pub trait IntegrationHost: Send + Sync {
    fn name(&self) -> &str;

    /// Path of this host through the tree, e.g. `urn:ccnet:local:Builds`
    fn qualified_name(&self) -> String;

    /// Ask for permission to integrate.
    ///
    /// Returns `true` when granted immediately. Otherwise the context has been
    /// locked and will be released once it is the requester's turn.
    fn ask_to_integrate(&self, context: &Arc<IntegrationContext>) -> bool;
}

/// A child of a server or queue
#[derive(Clone)]
pub enum ServerItem {
    Project(Arc<Project>),
    Queue(Arc<Queue>),
}

impl ServerItem {
    pub fn name(&self) -> &str {
        match self {
            ServerItem::Project(p) => p.name(),
            ServerItem::Queue(q) => q.name(),
        }
    }

    pub fn item_type(&self) -> &'static str {
        match self {
            ServerItem::Project(_) => "Project",
            ServerItem::Queue(_) => "Queue",
        }
    }

    pub fn universal_name(&self) -> String {
        self.links().universal_name(self.name())
    }

    /// Path through the host chain, falling back to the universal name
    pub fn qualified_name(&self) -> String {
        self.links().qualified_name(self.name())
    }

    pub fn host(&self) -> Option<Arc<dyn IntegrationHost>> {
        self.links().host()
    }

    pub fn server(&self) -> Option<Arc<Server>> {
        self.links().server()
    }

    pub fn validate(&self, log: &mut dyn ValidationLog) {
        match self {
            ServerItem::Project(p) => p.validate(log),
            ServerItem::Queue(q) => q.validate(log),
        }
    }

    /// Every project at or below this item, depth-first
    pub fn list_projects(&self) -> Vec<Arc<Project>> {
        match self {
            ServerItem::Project(p) => vec![Arc::clone(p)],
            ServerItem::Queue(q) => q.list_projects(),
        }
    }

    /// Find this item or a descendant by universal or qualified name
    pub fn locate(&self, urn: &str) -> Option<ServerItem> {
        if self.matches(urn) {
            return Some(self.clone());
        }
        match self {
            ServerItem::Project(_) => None,
            ServerItem::Queue(q) => q.children().iter().find_map(|c| c.locate(urn)),
        }
    }

    fn matches(&self, urn: &str) -> bool {
        urn.eq_ignore_ascii_case(&self.universal_name())
            || urn.eq_ignore_ascii_case(&self.qualified_name())
    }

    fn links(&self) -> &Links {
        match self {
            ServerItem::Project(p) => p.links(),
            ServerItem::Queue(q) => q.links(),
        }
    }

    pub(crate) fn set_host(&self, host: Option<Weak<dyn IntegrationHost>>) {
        self.links().set_host(host);
    }

    pub(crate) fn set_server(&self, server: Weak<Server>) {
        self.links().set_server(server.clone());
        if let ServerItem::Queue(q) = self {
            for child in q.children() {
                child.set_server(server.clone());
            }
        }
    }
}

impl From<Arc<Project>> for ServerItem {
    fn from(project: Arc<Project>) -> Self {
        ServerItem::Project(project)
    }
}

impl From<Arc<Queue>> for ServerItem {
    fn from(queue: Arc<Queue>) -> Self {
        ServerItem::Queue(queue)
    }
}

impl std::fmt::Debug for ServerItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.item_type(), self.name())
    }
}

/// Back-references from an item to its host and server
#[derive(Default)]
pub(crate) struct Links {
    host: Mutex<Option<Weak<dyn IntegrationHost>>>,
    server: Mutex<Weak<Server>>,
}

impl Links {
    pub(crate) fn host(&self) -> Option<Arc<dyn IntegrationHost>> {
        self.host
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .and_then(Weak::upgrade)
    }

    pub(crate) fn set_host(&self, host: Option<Weak<dyn IntegrationHost>>) {
        *self.host.lock().unwrap_or_else(|e| e.into_inner()) = host;
    }

    pub(crate) fn server(&self) -> Option<Arc<Server>> {
        self.server.lock().unwrap_or_else(|e| e.into_inner()).upgrade()
    }

    pub(crate) fn set_server(&self, server: Weak<Server>) {
        *self.server.lock().unwrap_or_else(|e| e.into_inner()) = server;
    }

    pub(crate) fn universal_name(&self, name: &str) -> String {
        let server = self
            .server()
            .map(|s| s.universal_name())
            .unwrap_or_else(|| URN_PREFIX.to_string());
        format!("{}:{}", server, name)
    }

    pub(crate) fn qualified_name(&self, name: &str) -> String {
        match self.host() {
            Some(host) => format!("{}:{}", host.qualified_name(), name),
            None => self.universal_name(name),
        }
    }
}

/// Report an empty item name
pub(crate) fn validate_name(name: &str, item_type: &str, log: &mut dyn ValidationLog) {
    if name.is_empty() {
        log.add_error("The {0} has no name specified.", &[item_type]);
    }
}

/// Report every name seen more than once, in first-seen order
pub(crate) fn report_duplicates<'a>(
    names: impl IntoIterator<Item = &'a str>,
    kind: &str,
    log: &mut dyn ValidationLog,
) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for name in names.into_iter().filter(|n| !n.is_empty()) {
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }
    for name in order {
        if counts.get(name).copied().unwrap_or(0) > 1 {
            log.add_error("Duplicate {1} name detected: '{0}'", &[name, kind]);
        }
    }
}

#[cfg(test)]
#[path = "structure_tests.rs"]
mod tests;
