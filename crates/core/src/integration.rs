// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integration requests and the synchronisation context that travels with them
//!
//! A context is created unlocked. A queue that cannot grant a slot immediately
//! locks it, and the requesting project then blocks in [`IntegrationContext::wait`]
//! until the queue releases it, someone cancels it, or the timeout elapses.

use crate::clock::{format_timestamp, Clock};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;
use uuid::Uuid;

type Listener = Arc<dyn Fn(&IntegrationContext) + Send + Sync>;

#[derive(Default)]
struct Flags {
    locked: bool,
    cancelled: bool,
    completed: bool,
}

#[derive(Default)]
struct Listeners {
    released: Vec<Listener>,
    completed: Vec<Listener>,
}

/// Per-request synchronisation object shared between a project and its queues
pub struct IntegrationContext {
    id: Uuid,
    item: String,
    flags: Mutex<Flags>,
    signal: Condvar,
    listeners: Mutex<Listeners>,
}

impl IntegrationContext {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            item: item.into(),
            flags: Mutex::new(Flags::default()),
            signal: Condvar::new(),
            listeners: Mutex::new(Listeners::default()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the item that asked for this integration
    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn is_locked(&self) -> bool {
        self.flags().locked
    }

    pub fn was_cancelled(&self) -> bool {
        self.flags().cancelled
    }

    pub fn is_completed(&self) -> bool {
        self.flags().completed
    }

    /// Mark the context as locked. Never blocks; ignored once completed.
    pub fn lock(&self) {
        let mut flags = self.flags();
        if flags.completed {
            return;
        }
        flags.locked = true;
    }

    /// Block until the context is unlocked or the timeout elapses.
    ///
    /// Returns `true` when the context is (or becomes) unlocked, including
    /// through cancellation, and `false` on timeout. Callers must check
    /// [`was_cancelled`](Self::was_cancelled) before proceeding.
    pub fn wait(&self, timeout: Duration) -> bool {
        let flags = self.flags();
        let (flags, result) = self
            .signal
            .wait_timeout_while(flags, timeout, |f| f.locked)
            .unwrap_or_else(|e| e.into_inner());
        !(result.timed_out() && flags.locked)
    }

    /// Unlock the context, waking any waiter
    pub fn release(&self) {
        let was_locked = {
            let mut flags = self.flags();
            let was_locked = flags.locked;
            flags.locked = false;
            was_locked
        };
        self.signal.notify_all();
        if was_locked {
            let listeners = self.listeners().released.clone();
            for listener in listeners {
                listener(self);
            }
        }
    }

    /// Cancel the request. A waiter wakes up and sees `was_cancelled`.
    pub fn cancel(&self) {
        {
            let mut flags = self.flags();
            flags.cancelled = true;
            flags.locked = false;
        }
        self.signal.notify_all();
    }

    /// Finish the request, notifying every completion listener.
    ///
    /// Listeners fire on every call so that a queue which promoted a request
    /// can always free the slot it holds.
    pub fn complete(&self) {
        {
            let mut flags = self.flags();
            flags.completed = true;
            flags.locked = false;
        }
        self.signal.notify_all();
        let listeners = self.listeners().completed.clone();
        for listener in listeners {
            listener(self);
        }
    }

    /// Register a callback fired when a locked context is released
    pub fn on_released(&self, listener: impl Fn(&IntegrationContext) + Send + Sync + 'static) {
        self.listeners().released.push(Arc::new(listener));
    }

    /// Register a callback fired whenever the context completes
    pub fn on_completed(&self, listener: impl Fn(&IntegrationContext) + Send + Sync + 'static) {
        self.listeners().completed.push(Arc::new(listener));
    }

    fn flags(&self) -> std::sync::MutexGuard<'_, Flags> {
        self.flags.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn listeners(&self) -> std::sync::MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for IntegrationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flags = self.flags();
        f.debug_struct("IntegrationContext")
            .field("id", &self.id)
            .field("item", &self.item)
            .field("locked", &flags.locked)
            .field("cancelled", &flags.cancelled)
            .field("completed", &flags.completed)
            .finish()
    }
}

/// An immutable record of why and when an integration was requested
#[derive(Clone, Debug)]
pub struct IntegrationRequest {
    source_trigger: String,
    requested_at: DateTime<Utc>,
    context: Arc<IntegrationContext>,
}

impl IntegrationRequest {
    pub fn new(source_trigger: impl Into<String>, item: impl Into<String>, clock: &dyn Clock) -> Self {
        Self {
            source_trigger: source_trigger.into(),
            requested_at: clock.now(),
            context: Arc::new(IntegrationContext::new(item)),
        }
    }

    pub fn source_trigger(&self) -> &str {
        &self.source_trigger
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    pub fn context(&self) -> &Arc<IntegrationContext> {
        &self.context
    }
}

impl std::fmt::Display for IntegrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} requested by '{}' at {}",
            self.context.item,
            self.source_trigger,
            format_timestamp(self.requested_at)
        )
    }
}

#[cfg(test)]
#[path = "integration_tests.rs"]
mod tests;
