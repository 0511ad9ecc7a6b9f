// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project life cycle and integration
//!
//! A started project runs a background thread that polls its triggers (and
//! any forced requests), asks its host for permission, waits for its turn and
//! then integrates:
//!
//! ```text
//! Stopped ──start()──▶ Running ──stop()──▶ Stopping ──(loop exits)──▶ Stopped
//! ```
//!
//! [`Project::integrate`] can also be called directly and does not depend on
//! the life cycle state.

use crate::error::ProjectError;
use crate::log_factory::{BuildLogFactory, NullBuildLogFactory};
use crate::structure::{validate_name, IntegrationHost, Links, Server};
use crate::trigger::Trigger;
use ccnet_core::{
    BuildLogError, Clock, EventBus, IntegrationContext, IntegrationRequest, IntegrationStatus,
    ProjectEvent, SystemClock, Task, TaskError, TaskExecutionContext, ValidationLog,
};
use ccnet_storage::{IntegrationSummary, ProjectState as PersistedState, StateStore};
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// How often a running project checks for work
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How long a project waits for its host to grant an integration
pub const DEFAULT_INTEGRATION_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Life cycle state of a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectState {
    #[default]
    Stopped,
    Running,
    Stopping,
}

impl ProjectState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectState::Stopped => "Stopped",
            ProjectState::Running => "Running",
            ProjectState::Stopping => "Stopping",
        }
    }
}

impl std::fmt::Display for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for [`Project`]
pub struct ProjectBuilder {
    name: String,
    tasks: Vec<Arc<Task>>,
    triggers: Vec<Box<dyn Trigger>>,
    clock: Arc<dyn Clock>,
    log_factory: Option<Arc<dyn BuildLogFactory>>,
    state_store: Option<Arc<StateStore>>,
    poll_interval: Duration,
    integration_timeout: Duration,
    events: Option<EventBus>,
}

impl ProjectBuilder {
    pub fn task(mut self, task: impl Into<Arc<Task>>) -> Self {
        self.tasks.push(task.into());
        self
    }

    pub fn tasks(mut self, tasks: impl IntoIterator<Item = Arc<Task>>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    pub fn trigger(mut self, trigger: impl Trigger + 'static) -> Self {
        self.triggers.push(Box::new(trigger));
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn log_factory(mut self, factory: Arc<dyn BuildLogFactory>) -> Self {
        self.log_factory = Some(factory);
        self
    }

    pub fn state_store(mut self, store: Arc<StateStore>) -> Self {
        self.state_store = Some(store);
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn integration_timeout(mut self, timeout: Duration) -> Self {
        self.integration_timeout = timeout;
        self
    }

    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> Arc<Project> {
        let log_factory = self
            .log_factory
            .unwrap_or_else(|| Arc::new(NullBuildLogFactory::new(Arc::clone(&self.clock))));
        Arc::new(Project {
            name: self.name,
            tasks: self.tasks,
            triggers: self.triggers,
            clock: self.clock,
            log_factory,
            state_store: self.state_store,
            poll_interval: self.poll_interval,
            integration_timeout: self.integration_timeout,
            events: self.events,
            links: Links::default(),
            state: Mutex::new(ProjectState::Stopped),
            state_changed: Condvar::new(),
            forced: Mutex::new(VecDeque::new()),
            waiting: Mutex::new(None),
            persisted: Mutex::new(None),
            integration_lock: Mutex::new(()),
            worker: Mutex::new(None),
            last_error: Mutex::new(None),
        })
    }
}

/// A named list of tasks with its own integration loop
pub struct Project {
    name: String,
    tasks: Vec<Arc<Task>>,
    triggers: Vec<Box<dyn Trigger>>,
    clock: Arc<dyn Clock>,
    log_factory: Arc<dyn BuildLogFactory>,
    state_store: Option<Arc<StateStore>>,
    poll_interval: Duration,
    integration_timeout: Duration,
    events: Option<EventBus>,
    links: Links,
    state: Mutex<ProjectState>,
    state_changed: Condvar,
    forced: Mutex<VecDeque<IntegrationRequest>>,
    /// Context the loop is currently waiting on, cancelled by `stop`
    waiting: Mutex<Option<Arc<IntegrationContext>>>,
    persisted: Mutex<Option<PersistedState>>,
    integration_lock: Mutex<()>,
    worker: Mutex<Option<JoinHandle<()>>>,
    last_error: Mutex<Option<String>>,
}

impl Project {
    pub fn builder(name: impl Into<String>) -> ProjectBuilder {
        ProjectBuilder {
            name: name.into(),
            tasks: Vec::new(),
            triggers: Vec::new(),
            clock: Arc::new(SystemClock),
            log_factory: None,
            state_store: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            integration_timeout: DEFAULT_INTEGRATION_TIMEOUT,
            events: None,
        }
    }

    pub fn new(name: impl Into<String>, tasks: Vec<Arc<Task>>) -> Arc<Self> {
        Self::builder(name).tasks(tasks).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tasks(&self) -> &[Arc<Task>] {
        &self.tasks
    }

    pub fn triggers(&self) -> &[Box<dyn Trigger>] {
        &self.triggers
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn state(&self) -> ProjectState {
        *self.lock_state()
    }

    pub fn can_start(&self) -> bool {
        self.state() == ProjectState::Stopped
    }

    pub fn can_stop(&self) -> bool {
        self.state() == ProjectState::Running
    }

    pub fn universal_name(&self) -> String {
        self.links.universal_name(&self.name)
    }

    pub fn host(&self) -> Option<Arc<dyn IntegrationHost>> {
        self.links.host()
    }

    pub fn server(&self) -> Option<Arc<Server>> {
        self.links.server()
    }

    /// Summary of the most recent loop-driven integration
    pub fn last_integration(&self) -> Option<IntegrationSummary> {
        self.persisted()
            .as_ref()
            .and_then(|s| s.last_integration.clone())
    }

    /// Message of the last integration that failed to run
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn validate(&self, log: &mut dyn ValidationLog) {
        validate_name(&self.name, "Project", log);
        for task in &self.tasks {
            task.validate(log);
        }
        for trigger in &self.triggers {
            trigger.validate(log);
        }
    }

    /// Start the integration loop on a background thread
    pub fn start(self: &Arc<Self>) -> Result<(), ProjectError> {
        if self.name.is_empty() {
            let err = ProjectError::MissingName;
            tracing::error!("{}", err);
            return Err(err);
        }

        {
            let mut state = self.lock_state();
            if *state != ProjectState::Stopped {
                let err = ProjectError::NotStopped(self.name.clone());
                tracing::warn!("{}", err);
                return Err(err);
            }
            *state = ProjectState::Running;
        }

        self.load_persisted_state();
        for trigger in &self.triggers {
            trigger.initialise();
        }

        let worker = Arc::clone(self);
        let spawned = std::thread::Builder::new()
            .name(format!("project-{}", self.name))
            .spawn(move || worker.run_loop());
        match spawned {
            Ok(handle) => {
                *self.worker.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
            }
            Err(source) => {
                self.set_state(ProjectState::Stopped);
                return Err(ProjectError::Spawn {
                    name: self.name.clone(),
                    source,
                });
            }
        }

        tracing::info!(project = %self.name, "project started");
        self.publish(ProjectEvent::Started {
            project: self.name.clone(),
        });
        Ok(())
    }

    /// Ask the integration loop to finish.
    ///
    /// A request still waiting for its host is cancelled; an integration in
    /// progress runs to completion.
    pub fn stop(&self) -> Result<(), ProjectError> {
        {
            let mut state = self.lock_state();
            if *state != ProjectState::Running {
                return Err(ProjectError::NotRunning(self.name.clone()));
            }
            *state = ProjectState::Stopping;
            // published under the lock so it always precedes Stopped
            tracing::info!(project = %self.name, "stopping project");
            self.publish(ProjectEvent::Stopping {
                project: self.name.clone(),
            });
        }
        self.state_changed.notify_all();

        let waiting = self.waiting().clone();
        if let Some(context) = waiting {
            context.cancel();
        }
        Ok(())
    }

    /// Block until the loop has exited. Returns `false` on timeout.
    pub fn wait_until_stopped(&self, timeout: Duration) -> bool {
        let state = self.lock_state();
        let (state, result) = self
            .state_changed
            .wait_timeout_while(state, timeout, |s| *s != ProjectState::Stopped)
            .unwrap_or_else(|e| e.into_inner());
        if result.timed_out() && *state != ProjectState::Stopped {
            return false;
        }
        drop(state);

        let handle = self.worker.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(handle) = handle {
            if handle.thread().id() != std::thread::current().id() {
                let _ = handle.join();
            }
        }
        true
    }

    /// Queue a manual integration, picked up ahead of any trigger
    pub fn force_build(&self, source: impl Into<String>) -> IntegrationRequest {
        let request = IntegrationRequest::new(source, self.name.as_str(), self.clock.as_ref());
        tracing::info!(project = %self.name, source = request.source_trigger(), "integration forced");
        self.forced
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(request.clone());
        request
    }

    /// Ask the host (if any) whether this project may integrate
    pub fn ask_to_integrate(&self, context: &Arc<IntegrationContext>) -> bool {
        match self.host() {
            Some(host) => {
                tracing::debug!(project = %self.name, host = host.name(), "asking host to integrate");
                host.ask_to_integrate(context)
            }
            None => true,
        }
    }

    /// Run every task once.
    ///
    /// Task failures are written to the build log and reflected in the
    /// returned status. Only build log failures are returned as errors.
    pub fn integrate(&self, request: &IntegrationRequest) -> Result<IntegrationStatus, ProjectError> {
        let _exclusive = self
            .integration_lock
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let started = Instant::now();
        tracing::info!(project = %self.name, source = request.source_trigger(), "integration starting");
        self.publish(ProjectEvent::IntegrationStarted {
            project: self.name.clone(),
            source: request.source_trigger().to_string(),
        });

        for task in &self.tasks {
            task.initialise();
        }
        let result = self.run_root(request);
        for task in &self.tasks {
            task.clean_up();
        }
        for trigger in &self.triggers {
            trigger.reset();
        }

        let status = match &result {
            Ok(status) => *status,
            Err(e) => {
                tracing::error!(project = %self.name, error = %e, "integration failed");
                IntegrationStatus::Error
            }
        };
        tracing::info!(
            project = %self.name,
            %status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "integration completed"
        );
        self.publish(ProjectEvent::IntegrationCompleted {
            project: self.name.clone(),
            status,
        });
        result
    }

    pub(crate) fn links(&self) -> &Links {
        &self.links
    }

    fn run_root(&self, request: &IntegrationRequest) -> Result<IntegrationStatus, ProjectError> {
        let context = self.log_factory.start_new(&self.name, request)?;
        let outcome = self.run_tasks(&context, &self.tasks);
        let status = context.current_status();
        let completed = context.complete();
        outcome?;
        completed?;
        Ok(status)
    }

    fn run_tasks(
        &self,
        parent: &Arc<TaskExecutionContext>,
        tasks: &[Arc<Task>],
    ) -> Result<(), BuildLogError> {
        for task in tasks {
            self.run_task(parent, task)?;
        }
        Ok(())
    }

    fn run_task(&self, parent: &Arc<TaskExecutionContext>, task: &Task) -> Result<(), BuildLogError> {
        if !task.can_run(parent) {
            tracing::debug!(project = %self.name, task = task.name(), "task skipped");
            task.skip();
            return Ok(());
        }

        let context = parent.start_child(task)?;
        let outcome = self.run_children(&context, task);
        let completed = context.complete();
        outcome?;
        completed
    }

    /// Run a task and then each child it yields, depth-first.
    ///
    /// A failure ends this task's children only; the caller moves on to the
    /// next sibling with the failure recorded in the status.
    fn run_children(
        &self,
        context: &Arc<TaskExecutionContext>,
        task: &Task,
    ) -> Result<(), BuildLogError> {
        for next in task.run(context) {
            let child = match next {
                Ok(child) => child,
                Err(e) => return self.report_failure(context, task, e),
            };
            child.initialise();
            let outcome = self.run_task(context, &child);
            child.clean_up();
            outcome?;
        }
        Ok(())
    }

    fn report_failure(
        &self,
        context: &TaskExecutionContext,
        task: &Task,
        error: TaskError,
    ) -> Result<(), BuildLogError> {
        tracing::warn!(project = %self.name, task = task.name(), error = %error, "task failed");
        context.record_status(error.status());
        context.add_entry_to_build_log(&error.to_string())
    }

    fn run_loop(self: Arc<Self>) {
        tracing::debug!(project = %self.name, "integration loop started");
        loop {
            {
                let state = self.lock_state();
                let (state, _) = self
                    .state_changed
                    .wait_timeout_while(state, self.poll_interval, |s| *s == ProjectState::Running)
                    .unwrap_or_else(|e| e.into_inner());
                if *state != ProjectState::Running {
                    break;
                }
            }
            self.check_for_integration();
        }

        for trigger in &self.triggers {
            trigger.clean_up();
        }
        self.set_state(ProjectState::Stopped);
        tracing::info!(project = %self.name, "project stopped");
        self.publish(ProjectEvent::Stopped {
            project: self.name.clone(),
        });
    }

    fn next_request(&self) -> Option<IntegrationRequest> {
        let forced = self
            .forced
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        forced.or_else(|| self.triggers.iter().find_map(|t| t.check(&self.name)))
    }

    fn check_for_integration(&self) {
        let Some(request) = self.next_request() else {
            return;
        };
        tracing::info!(
            project = %self.name,
            source = request.source_trigger(),
            "received integration request"
        );

        let context = Arc::clone(request.context());
        *self.waiting() = Some(Arc::clone(&context));
        self.ask_to_integrate(&context);
        // stop() may have run before the context was published
        if self.state() != ProjectState::Running {
            context.cancel();
        }
        let released = context.wait(self.integration_timeout);
        *self.waiting() = None;

        if released && !context.was_cancelled() {
            let start_time = self.clock.now();
            let status = match self.integrate(&request) {
                Ok(status) => status,
                Err(e) => {
                    *self.last_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(e.to_string());
                    IntegrationStatus::Error
                }
            };
            self.record(IntegrationSummary {
                start_time,
                finish_time: self.clock.now(),
                status,
            });
        } else {
            if !released {
                context.cancel();
            }
            tracing::info!(project = %self.name, "integration cancelled");
            for trigger in &self.triggers {
                trigger.reset();
            }
            self.publish(ProjectEvent::IntegrationCancelled {
                project: self.name.clone(),
                source: request.source_trigger().to_string(),
            });
        }
        context.complete();
    }

    fn load_persisted_state(&self) {
        let mut persisted = self.persisted();
        if persisted.is_some() {
            return;
        }
        let loaded = match &self.state_store {
            Some(store) => store.load(&self.name).unwrap_or_else(|e| {
                tracing::warn!(project = %self.name, error = %e, "failed to load project state");
                PersistedState::default()
            }),
            None => PersistedState::default(),
        };
        *persisted = Some(loaded);
    }

    fn record(&self, summary: IntegrationSummary) {
        let mut persisted = self.persisted();
        let state = persisted.get_or_insert_with(PersistedState::default);
        match &self.state_store {
            Some(store) => {
                if let Err(e) = store.record(&self.name, state, summary) {
                    tracing::error!(project = %self.name, error = %e, "failed to save project state");
                }
            }
            None => state.apply(summary),
        }
    }

    fn publish(&self, event: ProjectEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }

    fn set_state(&self, state: ProjectState) {
        *self.lock_state() = state;
        self.state_changed.notify_all();
    }

    fn lock_state(&self) -> MutexGuard<'_, ProjectState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn waiting(&self) -> MutexGuard<'_, Option<Arc<IntegrationContext>>> {
        self.waiting.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persisted(&self) -> MutexGuard<'_, Option<PersistedState>> {
        self.persisted.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
