// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File system adapters

mod local;

pub use local::LocalFileSystem;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeFileSystem, FsCall};

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from file system operations
#[derive(Debug, Error)]
pub enum FsError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Adapter for the file operations the server performs
pub trait FileSystem: Send + Sync {
    fn file_exists(&self, path: &Path) -> bool;

    fn open_file_for_read(&self, path: &Path) -> Result<Box<dyn Read + Send>, FsError>;

    /// Create or truncate a file, creating parent directories as needed
    fn open_file_for_write(&self, path: &Path) -> Result<Box<dyn Write + Send>, FsError>;
}
