// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: communication channels and the file system

pub mod channel;
pub mod fs;
pub mod traced;

pub use channel::{
    ActionDefinition, ActionDispatcher, ActionResponse, Channel, DispatchError, NoOpChannel,
};
pub use fs::{FileSystem, FsError, LocalFileSystem};
pub use traced::{TracedChannel, TracedFileSystem};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use channel::{ChannelCall, DispatchCall, FakeActionDispatcher, FakeChannel};
#[cfg(any(test, feature = "test-support"))]
pub use fs::{FakeFileSystem, FsCall};
