// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote actions on structure items, addressed by universal name

use crate::project::Project;
use crate::structure::{Located, Queue, Server, ServerItem};
use ccnet_adapters::{ActionDefinition, ActionDispatcher, ActionResponse, DispatchError};
use std::sync::{Arc, Weak};

const SERVER_ACTIONS: &[(&str, &str)] = &[
    ("list-projects", "Lists every project on the server"),
    ("status", "Reports how many projects the server hosts"),
    ("version", "Reports the server version"),
];

const PROJECT_ACTIONS: &[(&str, &str)] = &[
    ("force", "Requests an integration ahead of the triggers"),
    ("start", "Starts the integration loop"),
    ("status", "Reports the state and last integration"),
    ("stop", "Stops the integration loop"),
];

const QUEUE_ACTIONS: &[(&str, &str)] = &[("status", "Reports active and pending requests")];

/// Dispatches channel requests onto the server tree
pub struct ActionInvoker {
    server: Weak<Server>,
}

impl ActionInvoker {
    pub fn new(server: Weak<Server>) -> Self {
        Self { server }
    }

    fn server(&self) -> Result<Arc<Server>, DispatchError> {
        self.server.upgrade().ok_or(DispatchError::ServerUnavailable)
    }

    fn locate(&self, urn: &str) -> Result<Located, DispatchError> {
        self.server()?
            .locate(urn)
            .ok_or_else(|| DispatchError::ItemNotFound(urn.to_string()))
    }
}

impl ActionDispatcher for ActionInvoker {
    fn server_name(&self) -> String {
        self.server
            .upgrade()
            .map(|s| s.universal_name())
            .unwrap_or_default()
    }

    fn list(&self, urn: &str) -> Result<Vec<ActionDefinition>, DispatchError> {
        let actions = match self.locate(urn)? {
            Located::Server(_) => SERVER_ACTIONS,
            Located::Item(ServerItem::Project(_)) => PROJECT_ACTIONS,
            Located::Item(ServerItem::Queue(_)) => QUEUE_ACTIONS,
        };
        Ok(actions
            .iter()
            .map(|(name, description)| ActionDefinition::new(*name, *description))
            .collect())
    }

    fn invoke(&self, urn: &str, action: &str) -> Result<ActionResponse, DispatchError> {
        let located = self.locate(urn)?;
        let action_name = action.to_ascii_lowercase();
        tracing::info!(urn, action = %action_name, "invoking action");

        let message = match &located {
            Located::Server(server) => server_action(server, &action_name),
            Located::Item(ServerItem::Project(project)) => project_action(project, &action_name),
            Located::Item(ServerItem::Queue(queue)) => queue_action(queue, &action_name),
        }
        .ok_or_else(|| DispatchError::UnknownAction {
            urn: urn.to_string(),
            action: action.to_string(),
        })??;

        Ok(ActionResponse {
            urn: urn.to_string(),
            action: action_name,
            message,
        })
    }
}

type ActionResult = Option<Result<String, DispatchError>>;

fn server_action(server: &Server, action: &str) -> ActionResult {
    let result = match action {
        "list-projects" => Ok(server
            .list_projects()
            .iter()
            .map(|p| p.name().to_string())
            .collect::<Vec<_>>()
            .join("\n")),
        "status" => Ok(format!("{} project(s)", server.list_projects().len())),
        "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),
        _ => return None,
    };
    Some(result)
}

fn project_action(project: &Arc<Project>, action: &str) -> ActionResult {
    let failed = |e: crate::error::ProjectError| DispatchError::ActionFailed(e.to_string());
    let result = match action {
        "start" => project
            .start()
            .map(|()| format!("Project '{}' started", project.name()))
            .map_err(failed),
        "stop" => project
            .stop()
            .map(|()| format!("Project '{}' stopping", project.name()))
            .map_err(failed),
        "force" => {
            project.force_build("remote");
            Ok(format!("Integration requested for '{}'", project.name()))
        }
        "status" => Ok(match project.last_integration() {
            Some(last) => format!("{} (last integration: {})", project.state(), last.status),
            None => project.state().to_string(),
        }),
        _ => return None,
    };
    Some(result)
}

fn queue_action(queue: &Queue, action: &str) -> ActionResult {
    match action {
        "status" => Some(Ok(format!(
            "active: {}, pending: {}",
            queue.active_requests().len(),
            queue.pending_requests().len()
        ))),
        _ => None,
    }
}

#[cfg(test)]
#[path = "invoker_tests.rs"]
mod tests;
