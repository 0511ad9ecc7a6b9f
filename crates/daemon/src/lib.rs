// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ccnetd library: socket channel, wire protocol and daemon lifecycle

pub mod channel;
pub mod lifecycle;
pub mod protocol;

pub use channel::{ChannelError, SocketChannel, SocketChannelFactory};
pub use lifecycle::{Config, DaemonState, LifecycleError};
pub use protocol::{ProtocolError, Request, Response};
