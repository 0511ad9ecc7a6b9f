// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Root build log creation
//!
//! Each integration gets a fresh root [`TaskExecutionContext`]. The file
//! factory writes one XML document per integration:
//!
//! ```text
//! <build_log_dir>/<project>/<yyyyMMddHHmmss>.xml
//! ```

use ccnet_adapters::FileSystem;
use ccnet_core::{
    format_timestamp, BuildLogError, Clock, IntegrationRequest, LogWriter, NullLogWriter,
    TaskExecutionContext, TaskExecutionParameters, XmlLogWriter,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Creates the root context for an integration
pub trait BuildLogFactory: Send + Sync {
    fn start_new(
        &self,
        project: &str,
        request: &IntegrationRequest,
    ) -> Result<Arc<TaskExecutionContext>, BuildLogError>;
}

/// Discards build output
pub struct NullBuildLogFactory {
    clock: Arc<dyn Clock>,
}

impl NullBuildLogFactory {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl BuildLogFactory for NullBuildLogFactory {
    fn start_new(
        &self,
        project: &str,
        request: &IntegrationRequest,
    ) -> Result<Arc<TaskExecutionContext>, BuildLogError> {
        Ok(TaskExecutionContext::new(TaskExecutionParameters {
            writer: Box::new(NullLogWriter),
            clock: Arc::clone(&self.clock),
            request: Some(request.clone()),
            project: Some(project.to_string()),
        }))
    }
}

/// Writes XML build logs through a [`FileSystem`]
pub struct FileBuildLogFactory {
    fs: Arc<dyn FileSystem>,
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileBuildLogFactory {
    pub fn new(fs: Arc<dyn FileSystem>, dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            fs,
            dir: dir.into(),
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Next free log path for a project, suffixing when several
    /// integrations start within the same second
    fn log_path(&self, project: &str) -> PathBuf {
        let project_dir = self.dir.join(safe_file_name(project));
        let stamp = self.clock.now().format("%Y%m%d%H%M%S").to_string();
        let mut path = project_dir.join(format!("{}.xml", stamp));
        let mut n = 1;
        while self.fs.file_exists(&path) {
            path = project_dir.join(format!("{}-{}.xml", stamp, n));
            n += 1;
        }
        path
    }
}

impl BuildLogFactory for FileBuildLogFactory {
    fn start_new(
        &self,
        project: &str,
        request: &IntegrationRequest,
    ) -> Result<Arc<TaskExecutionContext>, BuildLogError> {
        let path = self.log_path(project);
        let out = self
            .fs
            .open_file_for_write(&path)
            .map_err(|e| BuildLogError::Io(std::io::Error::other(e.to_string())))?;

        let mut writer = XmlLogWriter::new(out);
        writer.write_declaration()?;
        writer.write_start_element("integration")?;
        writer.write_attribute("project", project)?;
        writer.write_attribute("source", request.source_trigger())?;
        writer.write_attribute("requested", &format_timestamp(request.requested_at()))?;
        tracing::debug!(project, path = %path.display(), "build log opened");

        Ok(TaskExecutionContext::new(TaskExecutionParameters {
            writer: Box::new(writer),
            clock: Arc::clone(&self.clock),
            request: Some(request.clone()),
            project: Some(project.to_string()),
        }))
    }
}

fn safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') { c } else { '_' })
        .collect()
}

#[cfg(test)]
#[path = "log_factory_tests.rs"]
mod tests;
