// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Root of the structure tree

use super::{report_duplicates, validate_name, IntegrationHost, ServerItem, URN_PREFIX};
use crate::invoker::ActionInvoker;
use crate::project::Project;
use ccnet_adapters::{ActionDispatcher, Channel};
use ccnet_core::{IntegrationContext, ValidationLog};
use std::sync::{Arc, Mutex, Weak};

/// Result of [`Server::locate`]
#[derive(Clone, Debug)]
pub enum Located {
    Server(Arc<Server>),
    Item(ServerItem),
}

/// Owns the top-level items and the communication channels
pub struct Server {
    name: String,
    children: Mutex<Vec<ServerItem>>,
    channels: Mutex<Vec<Arc<dyn Channel>>>,
    invoker: Mutex<Option<Arc<dyn ActionDispatcher>>>,
    this: Weak<Server>,
}

impl Server {
    pub fn new(name: impl Into<String>, children: Vec<ServerItem>) -> Arc<Self> {
        let server = Arc::new_cyclic(|this: &Weak<Server>| Self {
            name: name.into(),
            children: Mutex::new(Vec::new()),
            channels: Mutex::new(Vec::new()),
            invoker: Mutex::new(None),
            this: this.clone(),
        });
        for child in children {
            server.add_child(child);
        }
        server
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `urn:ccnet:<name>`, keeping the trailing colon when the name is empty
    pub fn universal_name(&self) -> String {
        format!("{}{}", URN_PREFIX, self.name)
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
        child.set_server(self.this.clone());
        self.children
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(child);
    }

    /// Detach the first child called `name`, clearing its back-references
    pub fn remove_child(&self, name: &str) -> Option<ServerItem> {
        let mut children = self.children.lock().unwrap_or_else(|e| e.into_inner());
        let index = children.iter().position(|c| c.name() == name)?;
        let child = children.remove(index);
        child.set_host(None);
        child.set_server(Weak::new());
        Some(child)
    }

    pub fn add_channel(&self, channel: Arc<dyn Channel>) {
        self.channels
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(channel);
    }

    pub fn channels(&self) -> Vec<Arc<dyn Channel>> {
        self.channels
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the dispatcher handed to channels
    pub fn set_action_invoker(&self, invoker: Arc<dyn ActionDispatcher>) {
        *self.invoker.lock().unwrap_or_else(|e| e.into_inner()) = Some(invoker);
    }

    /// The configured dispatcher, or an [`ActionInvoker`] over this server
    pub fn action_invoker(&self) -> Arc<dyn ActionDispatcher> {
        let mut invoker = self.invoker.lock().unwrap_or_else(|e| e.into_inner());
        match invoker.as_ref() {
            Some(existing) => Arc::clone(existing),
            None => {
                let created: Arc<dyn ActionDispatcher> =
                    Arc::new(ActionInvoker::new(self.this.clone()));
                *invoker = Some(Arc::clone(&created));
                created
            }
        }
    }

    /// Initialise every channel. A channel that fails is logged and skipped.
    ///
    /// Returns how many channels started.
    pub fn open_communications(&self) -> usize {
        let invoker = self.action_invoker();
        let mut opened = 0;
        for channel in self.channels() {
            if channel.initialise(Arc::clone(&invoker)) {
                opened += 1;
            } else {
                tracing::warn!(server = %self.name, channel = channel.name(), "channel failed to initialise");
            }
        }
        tracing::info!(server = %self.name, opened, "communications opened");
        opened
    }

    pub fn close_communications(&self) {
        for channel in self.channels() {
            channel.clean_up();
        }
        tracing::info!(server = %self.name, "communications closed");
    }

    /// Every project in the tree, depth-first
    pub fn list_projects(&self) -> Vec<Arc<Project>> {
        self.children()
            .iter()
            .flat_map(ServerItem::list_projects)
            .collect()
    }

    /// Find the server or an item by name. Matching ignores ASCII case.
    pub fn locate(&self, urn: &str) -> Option<Located> {
        if urn.eq_ignore_ascii_case(&self.universal_name()) {
            return self.this.upgrade().map(Located::Server);
        }
        self.children()
            .iter()
            .find_map(|c| c.locate(urn))
            .map(Located::Item)
    }

    pub fn validate(&self, log: &mut dyn ValidationLog) {
        validate_name(&self.name, "Server", log);
        let children = self.children();
        for child in &children {
            child.validate(log);
        }
        report_duplicates(children.iter().map(ServerItem::name), "child", log);

        let projects = self.list_projects();
        report_duplicates(projects.iter().map(|p| p.name()), "project", log);
    }
}

impl IntegrationHost for Server {
    fn name(&self) -> &str {
        &self.name
    }

    fn qualified_name(&self) -> String {
        self.universal_name()
    }

    fn ask_to_integrate(&self, _context: &Arc<IntegrationContext>) -> bool {
        true
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("name", &self.name)
            .field("children", &self.children())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
