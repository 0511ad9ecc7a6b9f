// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op channel for servers without external communications.

use super::{ActionDispatcher, Channel};
use std::sync::Arc;

/// Channel that accepts initialisation and does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpChannel;

impl NoOpChannel {
    pub fn new() -> Self {
        Self
    }
}

impl Channel for NoOpChannel {
    fn name(&self) -> &str {
        "noop"
    }

    fn initialise(&self, _dispatcher: Arc<dyn ActionDispatcher>) -> bool {
        true
    }

    fn clean_up(&self) {}
}
