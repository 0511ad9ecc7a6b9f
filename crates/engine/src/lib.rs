// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Integration engine: projects, queues, the server tree and the application

mod application;
mod error;
mod invoker;
mod loader;
mod log_factory;
mod project;
pub mod structure;
pub mod tasks;
mod trigger;

pub use application::Application;
pub use error::{ApplicationError, ProjectError};
pub use invoker::ActionInvoker;
pub use loader::{ChannelFactory, ConfigurationService, TomlConfigurationService};
pub use log_factory::{BuildLogFactory, FileBuildLogFactory, NullBuildLogFactory};
pub use project::{
    Project, ProjectBuilder, ProjectState, DEFAULT_INTEGRATION_TIMEOUT, DEFAULT_POLL_INTERVAL,
};
pub use structure::{IntegrationHost, Located, Queue, Server, ServerItem, URN_PREFIX};
pub use trigger::{IntervalTrigger, Trigger};
