// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    unknown_then_success = { IntegrationStatus::Unknown, IntegrationStatus::Success, IntegrationStatus::Success },
    success_then_failure = { IntegrationStatus::Success, IntegrationStatus::Failure, IntegrationStatus::Failure },
    failure_then_success = { IntegrationStatus::Failure, IntegrationStatus::Success, IntegrationStatus::Failure },
    failure_then_error = { IntegrationStatus::Failure, IntegrationStatus::Error, IntegrationStatus::Error },
    error_then_cancelled = { IntegrationStatus::Error, IntegrationStatus::Cancelled, IntegrationStatus::Error },
    cancelled_then_success = { IntegrationStatus::Cancelled, IntegrationStatus::Success, IntegrationStatus::Cancelled },
)]
fn worst_keeps_the_more_severe(current: IntegrationStatus, next: IntegrationStatus, expected: IntegrationStatus) {
    assert_eq!(current.worst(next), expected);
}

#[test]
fn parse_ignores_case() {
    assert_eq!(IntegrationStatus::parse("success"), Some(IntegrationStatus::Success));
    assert_eq!(IntegrationStatus::parse("FAILURE"), Some(IntegrationStatus::Failure));
    assert_eq!(IntegrationStatus::parse("broken"), None);
}

#[test]
fn display_uses_status_name() {
    assert_eq!(IntegrationStatus::Success.to_string(), "Success");
}
