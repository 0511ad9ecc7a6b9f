// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only log of integration summaries

use crate::state::{IntegrationSummary, StorageError};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// One JSON line per completed integration
pub struct IntegrationHistory {
    file: File,
    sequence: u64,
}

impl IntegrationHistory {
    /// Open or create a history log at the given path
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let reader = BufReader::new(File::open(path)?);
        let sequence = reader
            .lines()
            .map_while(Result::ok)
            .filter(|l| !l.is_empty())
            .count() as u64;

        Ok(Self { file, sequence })
    }

    /// Append a summary, returning its sequence number
    pub fn append(&mut self, summary: &IntegrationSummary) -> Result<u64, StorageError> {
        self.sequence += 1;
        let entry = HistoryEntry {
            seq: self.sequence,
            summary: summary.clone(),
        };
        let line = serde_json::to_string(&entry)?;
        writeln!(self.file, "{}", line)?;
        self.file.sync_all()?;
        Ok(self.sequence)
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Read every summary in the log, oldest first
    pub fn replay(path: &Path) -> Result<Vec<IntegrationSummary>, StorageError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let entry: HistoryEntry = serde_json::from_str(&line)?;
            summaries.push(entry.summary);
        }
        Ok(summaries)
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct HistoryEntry {
    seq: u64,
    summary: IntegrationSummary,
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
