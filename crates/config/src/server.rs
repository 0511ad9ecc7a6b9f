// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server, queue and channel definitions

use crate::project::ProjectDef;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_allowed_active() -> usize {
    1
}

/// The `[server]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDef {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "channel")]
    pub channels: Vec<ChannelDef>,
}

/// A communications channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ChannelDef {
    /// Unix socket speaking the length-prefixed JSON protocol
    Socket {
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

/// A queue limiting how many of its items integrate at once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDef {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_allowed_active")]
    pub allowed_active: usize,
    #[serde(default, rename = "project")]
    pub projects: Vec<ProjectDef>,
    #[serde(default, rename = "queue")]
    pub queues: Vec<QueueDef>,
}

/// Optional `[daemon]` path overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonDef {
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    #[serde(default)]
    pub log_path: Option<PathBuf>,
    #[serde(default)]
    pub build_log_dir: Option<PathBuf>,
}
