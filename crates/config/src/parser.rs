// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration TOML parsing

use crate::{DaemonDef, ProjectDef, QueueDef, ServerDef};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "ccnet.toml";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// A parsed configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDef {
    #[serde(default)]
    pub server: ServerDef,
    #[serde(default)]
    pub daemon: DaemonDef,
    #[serde(default, rename = "queue")]
    pub queues: Vec<QueueDef>,
    #[serde(default, rename = "project")]
    pub projects: Vec<ProjectDef>,
}

impl ConfigDef {
    /// Every project name, including those nested in queues, in file order
    pub fn project_names(&self) -> Vec<&str> {
        fn collect<'a>(queue: &'a QueueDef, names: &mut Vec<&'a str>) {
            names.extend(queue.projects.iter().map(|p| p.name.as_str()));
            for nested in &queue.queues {
                collect(nested, names);
            }
        }

        let mut names = Vec::new();
        for queue in &self.queues {
            collect(queue, &mut names);
        }
        names.extend(self.projects.iter().map(|p| p.name.as_str()));
        names
    }
}

/// Parse configuration from TOML content
pub fn parse_config(content: &str) -> Result<ConfigDef, ConfigError> {
    let config: ConfigDef = toml::from_str(content)?;
    for queue in &config.queues {
        check_queue(queue)?;
    }
    Ok(config)
}

/// Read and parse a configuration file
pub fn load_config(path: &Path) -> Result<ConfigDef, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

fn check_queue(queue: &QueueDef) -> Result<(), ConfigError> {
    if queue.allowed_active == 0 {
        return Err(ConfigError::InvalidFormat(format!(
            "queue.{}.allowed_active must be at least 1",
            queue.name
        )));
    }
    for nested in &queue.queues {
        check_queue(nested)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
