// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Server configuration parsing and definitions

mod parser;
mod project;
mod server;

pub use parser::{load_config, parse_config, ConfigDef, ConfigError, DEFAULT_CONFIG_FILE};
pub use project::{ConditionDef, ProjectDef, TaskDef, TriggerDef, DEFAULT_POLL_INTERVAL_MS};
pub use server::{ChannelDef, DaemonDef, QueueDef, ServerDef};
