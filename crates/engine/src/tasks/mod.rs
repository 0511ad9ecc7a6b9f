// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in task kinds and conditions

mod comment;
mod condition;
mod exec;
mod sequential;

pub use comment::Comment;
pub use condition::StatusCondition;
pub use exec::Exec;
pub use sequential::Sequential;
