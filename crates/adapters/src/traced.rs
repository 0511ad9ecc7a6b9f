// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::channel::{ActionDispatcher, Channel};
use crate::fs::{FileSystem, FsError};
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

/// Wrapper that adds tracing to any Channel
#[derive(Clone)]
pub struct TracedChannel<C> {
    inner: C,
}

impl<C> TracedChannel<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: Channel> Channel for TracedChannel<C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn initialise(&self, dispatcher: Arc<dyn ActionDispatcher>) -> bool {
        let span = tracing::info_span!("channel.initialise", channel = self.inner.name());
        let _guard = span.enter();

        tracing::info!(server = %dispatcher.server_name(), "starting");
        let start = std::time::Instant::now();
        let ok = self.inner.initialise(dispatcher);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if ok {
            tracing::info!(elapsed_ms, "channel open");
        } else {
            tracing::warn!(elapsed_ms, "channel failed to open");
        }
        ok
    }

    fn clean_up(&self) {
        let span = tracing::info_span!("channel.clean_up", channel = self.inner.name());
        let _guard = span.enter();

        self.inner.clean_up();
        tracing::info!("channel closed");
    }
}

/// Wrapper that adds tracing to any FileSystem
#[derive(Clone)]
pub struct TracedFileSystem<F> {
    inner: F,
}

impl<F> TracedFileSystem<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: FileSystem> FileSystem for TracedFileSystem<F> {
    fn file_exists(&self, path: &Path) -> bool {
        let exists = self.inner.file_exists(path);
        tracing::trace!(path = %path.display(), exists, "checked");
        exists
    }

    fn open_file_for_read(&self, path: &Path) -> Result<Box<dyn Read + Send>, FsError> {
        let span = tracing::info_span!("fs.read", path = %path.display());
        let _guard = span.enter();

        let result = self.inner.open_file_for_read(path);
        match &result {
            Ok(_) => tracing::debug!("opened"),
            Err(e) => tracing::error!(error = %e, "open failed"),
        }
        result
    }

    fn open_file_for_write(&self, path: &Path) -> Result<Box<dyn Write + Send>, FsError> {
        let span = tracing::info_span!("fs.write", path = %path.display());
        let _guard = span.enter();

        let result = self.inner.open_file_for_write(path);
        match &result {
            Ok(_) => tracing::debug!("created"),
            Err(e) => tracing::error!(error = %e, "create failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
