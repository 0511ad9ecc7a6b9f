// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local disk file system

use super::{FileSystem, FsError};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(path: &Path, source: std::io::Error) -> FsError {
    if source.kind() == std::io::ErrorKind::NotFound {
        FsError::NotFound(path.to_path_buf())
    } else {
        FsError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl FileSystem for LocalFileSystem {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn open_file_for_read(&self, path: &Path) -> Result<Box<dyn Read + Send>, FsError> {
        let file = File::open(path).map_err(|e| io_error(path, e))?;
        Ok(Box::new(file))
    }

    fn open_file_for_write(&self, path: &Path) -> Result<Box<dyn Write + Send>, FsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        let file = File::create(path).map_err(|e| io_error(path, e))?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
