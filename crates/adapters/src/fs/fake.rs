// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory file system for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{FileSystem, FsError};
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Recorded file system call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsCall {
    Exists(PathBuf),
    Read(PathBuf),
    Write(PathBuf),
}

type Files = Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>;

/// File system backed by a shared map of path to contents
#[derive(Clone, Default)]
pub struct FakeFileSystem {
    files: Files,
    calls: Arc<Mutex<Vec<FsCall>>>,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file
    pub fn add_file(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), contents.into());
    }

    /// Current contents of a file as text
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).to_string())
    }

    /// Every path written or seeded
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self
            .files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<FsCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, call: FsCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

impl FileSystem for FakeFileSystem {
    fn file_exists(&self, path: &Path) -> bool {
        self.record(FsCall::Exists(path.to_path_buf()));
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(path)
    }

    fn open_file_for_read(&self, path: &Path) -> Result<Box<dyn Read + Send>, FsError> {
        self.record(FsCall::Read(path.to_path_buf()));
        let bytes = self
            .files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn open_file_for_write(&self, path: &Path) -> Result<Box<dyn Write + Send>, FsError> {
        self.record(FsCall::Write(path.to_path_buf()));
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_path_buf(), Vec::new());
        Ok(Box::new(FakeFile {
            path: path.to_path_buf(),
            files: Arc::clone(&self.files),
        }))
    }
}

/// Writer that appends straight into the shared map
struct FakeFile {
    path: PathBuf,
    files: Files,
}

impl Write for FakeFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(self.path.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
