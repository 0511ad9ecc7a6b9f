// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake channel and dispatcher for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ActionDefinition, ActionDispatcher, ActionResponse, Channel, DispatchError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded channel call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelCall {
    Initialise,
    CleanUp,
}

/// Fake channel that records calls and keeps the dispatcher it was given
#[derive(Clone)]
pub struct FakeChannel {
    name: String,
    initialise_result: bool,
    calls: Arc<Mutex<Vec<ChannelCall>>>,
    dispatcher: Arc<Mutex<Option<Arc<dyn ActionDispatcher>>>>,
}

impl FakeChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initialise_result: true,
            calls: Arc::new(Mutex::new(Vec::new())),
            dispatcher: Arc::new(Mutex::new(None)),
        }
    }

    /// Make `initialise` report failure
    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            initialise_result: false,
            ..Self::new(name)
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ChannelCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The dispatcher passed to the last `initialise`
    pub fn dispatcher(&self) -> Option<Arc<dyn ActionDispatcher>> {
        self.dispatcher
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self, call: ChannelCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

impl Channel for FakeChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialise(&self, dispatcher: Arc<dyn ActionDispatcher>) -> bool {
        self.record(ChannelCall::Initialise);
        *self.dispatcher.lock().unwrap_or_else(|e| e.into_inner()) = Some(dispatcher);
        self.initialise_result
    }

    fn clean_up(&self) {
        self.record(ChannelCall::CleanUp);
    }
}

/// Recorded dispatcher call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchCall {
    List { urn: String },
    Invoke { urn: String, action: String },
}

/// Dispatcher with canned actions per URN
#[derive(Clone, Default)]
pub struct FakeActionDispatcher {
    server_name: String,
    actions: Arc<Mutex<HashMap<String, Vec<ActionDefinition>>>>,
    calls: Arc<Mutex<Vec<DispatchCall>>>,
}

impl FakeActionDispatcher {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            ..Self::default()
        }
    }

    /// Register an item and the actions it supports
    pub fn add_item(&self, urn: &str, actions: &[&str]) {
        let definitions = actions
            .iter()
            .map(|a| ActionDefinition::new(*a, format!("fake {}", a)))
            .collect();
        self.actions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(urn.to_string(), definitions);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<DispatchCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, call: DispatchCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

impl ActionDispatcher for FakeActionDispatcher {
    fn server_name(&self) -> String {
        self.server_name.clone()
    }

    fn list(&self, urn: &str) -> Result<Vec<ActionDefinition>, DispatchError> {
        self.record(DispatchCall::List {
            urn: urn.to_string(),
        });
        self.actions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(urn)
            .cloned()
            .ok_or_else(|| DispatchError::ItemNotFound(urn.to_string()))
    }

    fn invoke(&self, urn: &str, action: &str) -> Result<ActionResponse, DispatchError> {
        self.record(DispatchCall::Invoke {
            urn: urn.to_string(),
            action: action.to_string(),
        });
        let actions = self.actions.lock().unwrap_or_else(|e| e.into_inner());
        let available = actions
            .get(urn)
            .ok_or_else(|| DispatchError::ItemNotFound(urn.to_string()))?;
        if !available.iter().any(|a| a.name.eq_ignore_ascii_case(action)) {
            return Err(DispatchError::UnknownAction {
                urn: urn.to_string(),
                action: action.to_string(),
            });
        }
        Ok(ActionResponse {
            urn: urn.to_string(),
            action: action.to_string(),
            message: format!("{} done", action),
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
