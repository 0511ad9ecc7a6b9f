// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ccnet_core::IntegrationStatus;
use chrono::{TimeZone, Utc};

fn summary(minute: u32, status: IntegrationStatus) -> IntegrationSummary {
    IntegrationSummary {
        start_time: Utc.with_ymd_and_hms(2010, 1, 1, 12, minute, 0).unwrap(),
        finish_time: Utc.with_ymd_and_hms(2010, 1, 1, 12, minute, 30).unwrap(),
        status,
    }
}

#[test]
fn appended_summaries_replay_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");

    {
        let mut history = IntegrationHistory::open(&path).unwrap();
        history.append(&summary(1, IntegrationStatus::Success)).unwrap();
        history.append(&summary(2, IntegrationStatus::Failure)).unwrap();
    }

    let replayed = IntegrationHistory::replay(&path).unwrap();
    assert_eq!(
        replayed,
        vec![
            summary(1, IntegrationStatus::Success),
            summary(2, IntegrationStatus::Failure)
        ]
    );
}

#[test]
fn sequence_continues_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");

    {
        let mut history = IntegrationHistory::open(&path).unwrap();
        assert_eq!(history.sequence(), 0);
        assert_eq!(history.append(&summary(1, IntegrationStatus::Success)).unwrap(), 1);
    }

    let mut history = IntegrationHistory::open(&path).unwrap();
    assert_eq!(history.sequence(), 1);
    assert_eq!(history.append(&summary(2, IntegrationStatus::Success)).unwrap(), 2);
}

#[test]
fn replay_of_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let replayed = IntegrationHistory::replay(&dir.path().join("missing.jsonl")).unwrap();
    assert!(replayed.is_empty());
}

#[test]
fn replay_rejects_corrupt_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");
    std::fs::write(&path, "not json\n").unwrap();
    assert!(matches!(
        IntegrationHistory::replay(&path),
        Err(StorageError::Json(_))
    ));
}
