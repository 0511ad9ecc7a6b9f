// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use ccnet_adapters::FsError;
use ccnet_config::ConfigError;
use ccnet_core::BuildLogError;
use thiserror::Error;

/// Errors from project life cycle operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Cannot start a project without a name")]
    MissingName,
    #[error("The project '{0}' must be in a stopped state before it can be started")]
    NotStopped(String),
    #[error("The project '{0}' must be in a running state before it can be stopped")]
    NotRunning(String),
    #[error("failed to spawn thread for project '{name}': {source}")]
    Spawn {
        name: String,
        source: std::io::Error,
    },
    #[error("build log error: {0}")]
    BuildLog(#[from] BuildLogError),
}

/// Errors from the top-level application
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("{0} has not been initialised")]
    NotInitialised(&'static str),
    #[error("Fatal errors found in configuration")]
    FatalConfiguration { errors: usize },
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("file system error: {0}")]
    Fs(#[from] FsError),
    #[error(transparent)]
    Project(#[from] ProjectError),
}
