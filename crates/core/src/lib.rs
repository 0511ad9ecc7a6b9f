// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ccnet-core: building blocks for the continuous integration server
//!
//! This crate provides:
//! - The task lifecycle and hierarchical execution contexts
//! - Integration requests and their queue synchronisation context
//! - Streaming build log writers
//! - Validation logging and project events

pub mod build_log;
pub mod clock;
pub mod context;
pub mod events;
pub mod integration;
pub mod modification;
pub mod status;
pub mod task;
pub mod validation;

pub use build_log::{
    BuildLogError, LogWriter, NullLogWriter, RecordingLogWriter, WriterCall, XmlLogWriter,
};
pub use clock::{format_timestamp, Clock, FakeClock, SystemClock};
pub use context::{SharedLogWriter, TaskExecutionContext, TaskExecutionParameters};
pub use events::{EventBus, EventReceiver, ProjectEvent, SubscriberId};
pub use integration::{IntegrationContext, IntegrationRequest};
pub use modification::{Modification, ModificationSet};
pub use status::IntegrationStatus;
pub use task::{Task, TaskBehaviour, TaskCondition, TaskError, TaskRun, TaskState};
pub use validation::{CollectingValidationLog, Severity, ValidationEntry, ValidationLog};
