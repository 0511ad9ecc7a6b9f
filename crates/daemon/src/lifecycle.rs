// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ccnet_adapters::{Channel, LocalFileSystem, NoOpChannel, TracedFileSystem};
use ccnet_config::{load_config, ChannelDef, ConfigError, DaemonDef};
use ccnet_core::{CollectingValidationLog, EventBus, ProjectEvent, SystemClock, ValidationEntry};
use ccnet_engine::{
    Application, ApplicationError, ChannelFactory, FileBuildLogFactory, TomlConfigurationService,
};
use ccnet_storage::StateStore;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::channel::SocketChannelFactory;

/// How long shutdown waits for each project thread
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Configuration file the server tree is loaded from
    pub config_path: PathBuf,
    /// Persisted project state
    pub state_dir: PathBuf,
    /// Daemon log file
    pub log_path: PathBuf,
    /// Root of the per-project XML build logs
    pub build_log_dir: PathBuf,
    /// Socket used when a channel does not name one
    pub socket_path: PathBuf,
}

impl Config {
    /// Read the `[daemon]` table of the configuration file and resolve paths
    pub fn load(config_path: &Path) -> Result<Self, LifecycleError> {
        let def = load_config(config_path)?;
        Ok(Self::resolve(config_path, &def.daemon))
    }

    /// Paths default to `<config dir>/.ccnet/`; relative overrides are taken
    /// from the configuration file's directory.
    pub fn resolve(config_path: &Path, daemon: &DaemonDef) -> Self {
        let base = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let state_root = base.join(".ccnet");
        let pick = |custom: &Option<PathBuf>, default: PathBuf| match custom {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => base.join(path),
            None => default,
        };

        Self {
            config_path: config_path.to_path_buf(),
            state_dir: pick(&daemon.state_dir, state_root.join("state")),
            log_path: pick(&daemon.log_path, state_root.join("ccnetd.log")),
            build_log_dir: pick(&daemon.build_log_dir, state_root.join("logs")),
            socket_path: state_root.join("ccnetd.sock"),
        }
    }
}

/// Daemon lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("Log path has no parent directory: {0}")]
    NoLogDir(PathBuf),
}

/// A running daemon
pub struct DaemonState {
    pub config: Config,
    pub application: Application,
    pub start_time: Instant,
    event_log: JoinHandle<()>,
}

impl DaemonState {
    /// Stop every project and wait for their threads to finish
    pub fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");
        self.application.stop()?;

        if let Some(server) = self.application.configuration() {
            for project in server.list_projects() {
                if !project.wait_until_stopped(SHUTDOWN_TIMEOUT) {
                    warn!(project = %project.name(), "project did not stop in time");
                }
            }
        }
        self.event_log.abort();

        info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
        Ok(())
    }
}

/// Load, validate and start the configured server
pub fn startup(config: &Config, handle: Handle) -> Result<DaemonState, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;
    std::fs::create_dir_all(&config.build_log_dir)?;

    let clock = Arc::new(SystemClock);
    let fs = Arc::new(TracedFileSystem::new(LocalFileSystem::new()));
    let events = EventBus::new();
    let (_, mut receiver) = events.subscribe(&["project:*", "integration:*"]);

    let service = TomlConfigurationService::new()
        .with_clock(clock.clone())
        .with_log_factory(Arc::new(FileBuildLogFactory::new(
            fs.clone(),
            &config.build_log_dir,
            clock,
        )))
        .with_state_store(Arc::new(StateStore::new(&config.state_dir)))
        .with_channel_factory(Arc::new(SocketChannelFactory::new(
            &config.socket_path,
            handle.clone(),
        )))
        .with_events(events);

    let mut application = Application::new()
        .with_configuration_service(Arc::new(service))
        .with_file_system(fs)
        .with_validation_log(Box::new(CollectingValidationLog::new()));
    application.load_configuration(&config.config_path)?;
    application.start()?;

    let event_log = handle.spawn(async move {
        while let Some(event) = receiver.recv().await {
            log_event(&event);
        }
    });

    info!(
        "Daemon started for configuration: {}",
        config.config_path.display()
    );

    Ok(DaemonState {
        config: config.clone(),
        application,
        start_time: Instant::now(),
        event_log,
    })
}

/// Outcome of checking a configuration file
#[derive(Debug)]
pub struct ValidationReport {
    pub entries: Vec<ValidationEntry>,
    pub error: Option<LifecycleError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Load and validate a configuration file without starting anything
pub fn validate(config_path: &Path) -> ValidationReport {
    let mut application = Application::new()
        .with_configuration_service(Arc::new(
            TomlConfigurationService::new().with_channel_factory(Arc::new(InertChannels)),
        ))
        .with_file_system(Arc::new(LocalFileSystem::new()))
        .with_validation_log(Box::new(CollectingValidationLog::new()));

    let error = application
        .load_configuration(config_path)
        .err()
        .map(LifecycleError::from);
    let entries = application
        .validation_log()
        .map(|log| log.entries().to_vec())
        .unwrap_or_default();
    ValidationReport { entries, error }
}

/// Channels are parsed but never opened while validating
struct InertChannels;

impl ChannelFactory for InertChannels {
    fn create(&self, _def: &ChannelDef) -> Result<Arc<dyn Channel>, ConfigError> {
        Ok(Arc::new(NoOpChannel::new()))
    }
}

fn log_event(event: &ProjectEvent) {
    match event {
        ProjectEvent::IntegrationCompleted { project, status } => {
            info!(project = %project, status = %status, "integration completed")
        }
        ProjectEvent::IntegrationCancelled { project, source } => {
            warn!(project = %project, source = %source, "integration cancelled")
        }
        other => info!(project = %other.project(), event = other.name(), "project event"),
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
