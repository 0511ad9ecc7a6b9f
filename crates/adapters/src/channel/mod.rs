// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Communication channels
//!
//! A channel exposes the server to the outside world. When communications
//! open, each channel is handed an [`ActionDispatcher`] that resolves item
//! URNs and performs actions on them.

mod noop;

pub use noop::NoOpChannel;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ChannelCall, DispatchCall, FakeActionDispatcher, FakeChannel};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors from dispatching an action
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DispatchError {
    #[error("Unable to find item with name '{0}'")]
    ItemNotFound(String),
    #[error("Unable to find action '{action}' on '{urn}'")]
    UnknownAction { urn: String, action: String },
    #[error("action failed: {0}")]
    ActionFailed(String),
    #[error("server is no longer available")]
    ServerUnavailable,
}

/// An action an item supports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub name: String,
    pub description: String,
}

impl ActionDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Result of a successful action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub urn: String,
    pub action: String,
    pub message: String,
}

/// Resolves URNs and performs actions on behalf of a channel
pub trait ActionDispatcher: Send + Sync {
    /// Universal name of the server being dispatched to
    fn server_name(&self) -> String;

    /// Actions available on the item at `urn`
    fn list(&self, urn: &str) -> Result<Vec<ActionDefinition>, DispatchError>;

    /// Perform `action` on the item at `urn`
    fn invoke(&self, urn: &str, action: &str) -> Result<ActionResponse, DispatchError>;
}

/// An inbound communications channel
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// Start listening. Returns `false` when the channel could not start.
    fn initialise(&self, dispatcher: Arc<dyn ActionDispatcher>) -> bool;

    /// Stop listening and release resources
    fn clean_up(&self);
}
