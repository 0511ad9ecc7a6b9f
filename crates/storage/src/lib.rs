// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable per-project integration state

mod history;
mod state;

pub use history::IntegrationHistory;
pub use state::{IntegrationSummary, ProjectState, StateStore, StorageError};
