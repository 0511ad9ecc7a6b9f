// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level composition: load, validate, start and stop a server

use crate::error::ApplicationError;
use crate::loader::ConfigurationService;
use crate::structure::Server;
use ccnet_adapters::FileSystem;
use ccnet_core::ValidationLog;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Drives a server tree loaded from a configuration file
#[derive(Default)]
pub struct Application {
    configuration_service: Option<Arc<dyn ConfigurationService>>,
    file_system: Option<Arc<dyn FileSystem>>,
    validation_log: Option<Box<dyn ValidationLog>>,
    configuration: Option<Arc<Server>>,
}

impl Application {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configuration_service(mut self, service: Arc<dyn ConfigurationService>) -> Self {
        self.configuration_service = Some(service);
        self
    }

    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.file_system = Some(fs);
        self
    }

    pub fn with_validation_log(mut self, log: Box<dyn ValidationLog>) -> Self {
        self.validation_log = Some(log);
        self
    }

    /// Use an already built server instead of loading one
    pub fn with_configuration(mut self, server: Arc<Server>) -> Self {
        self.configuration = Some(server);
        self
    }

    pub fn configuration(&self) -> Option<&Arc<Server>> {
        self.configuration.as_ref()
    }

    pub fn validation_log(&self) -> Option<&dyn ValidationLog> {
        self.validation_log.as_deref()
    }

    /// Load and validate the configuration at `path`.
    ///
    /// Any validation error is fatal; warnings are only logged.
    pub fn load_configuration(&mut self, path: &Path) -> Result<Arc<Server>, ApplicationError> {
        let service = self
            .configuration_service
            .clone()
            .ok_or(ApplicationError::NotInitialised("ConfigurationService"))?;
        let fs = self
            .file_system
            .clone()
            .ok_or(ApplicationError::NotInitialised("FileSystem"))?;
        let log = self
            .validation_log
            .as_deref_mut()
            .ok_or(ApplicationError::NotInitialised("ValidationLog"))?;

        tracing::info!(path = %path.display(), "loading configuration");
        let started = Instant::now();
        let mut reader = fs.open_file_for_read(path)?;
        let server = service.load(&mut reader).map_err(|e| {
            tracing::error!(error = %e, "unable to load configuration");
            e
        })?;
        tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "configuration loaded");

        log.reset();
        server.validate(log);
        let errors = log.number_of_errors();
        if errors > 0 {
            tracing::error!(errors, "errors were found in the configuration, unable to start server");
            return Err(ApplicationError::FatalConfiguration { errors });
        }
        let warnings = log.number_of_warnings();
        if warnings > 0 {
            tracing::warn!(
                warnings,
                "warnings were found in the configuration, the server may not perform as expected"
            );
        }

        self.configuration = Some(Arc::clone(&server));
        Ok(server)
    }

    /// Start every stopped project, then open communications.
    ///
    /// On failure everything started so far is stopped again.
    pub fn start(&self) -> Result<(), ApplicationError> {
        let server = self.require_configuration()?;
        tracing::info!(server = %server.name(), "starting application");

        let started = server
            .list_projects()
            .into_iter()
            .filter(|p| p.can_start())
            .try_for_each(|p| p.start());
        if let Err(e) = started {
            tracing::error!(error = %e, "a fatal error occurred while starting the application");
            let _ = self.stop();
            return Err(e.into());
        }

        server.open_communications();
        Ok(())
    }

    /// Close communications, then ask every running project to stop
    pub fn stop(&self) -> Result<(), ApplicationError> {
        let server = self.require_configuration()?;
        server.close_communications();
        tracing::info!(server = %server.name(), "stopping application");
        for project in server.list_projects().into_iter().filter(|p| p.can_stop()) {
            if let Err(e) = project.stop() {
                tracing::warn!(project = %project.name(), error = %e, "failed to stop project");
            }
        }
        Ok(())
    }

    fn require_configuration(&self) -> Result<&Arc<Server>, ApplicationError> {
        self.configuration
            .as_ref()
            .ok_or(ApplicationError::NotInitialised("Configuration"))
    }
}

#[cfg(test)]
#[path = "application_tests.rs"]
mod tests;
