// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Building the structure tree from configuration

use crate::log_factory::BuildLogFactory;
use crate::project::Project;
use crate::structure::{Queue, Server, ServerItem};
use crate::tasks::{Comment, Exec, Sequential, StatusCondition};
use crate::trigger::IntervalTrigger;
use ccnet_adapters::Channel;
use ccnet_config::{
    parse_config, ChannelDef, ConditionDef, ConfigDef, ConfigError, ProjectDef, QueueDef, TaskDef,
    TriggerDef,
};
use ccnet_core::{Clock, EventBus, IntegrationStatus, SystemClock, Task};
use ccnet_storage::StateStore;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

/// Turns a configuration stream into a server tree
pub trait ConfigurationService: Send + Sync {
    fn load(&self, reader: &mut dyn Read) -> Result<Arc<Server>, ConfigError>;
}

/// Creates concrete channels for `[[server.channel]]` entries
pub trait ChannelFactory: Send + Sync {
    fn create(&self, def: &ChannelDef) -> Result<Arc<dyn Channel>, ConfigError>;
}

/// [`ConfigurationService`] reading the TOML format
pub struct TomlConfigurationService {
    clock: Arc<dyn Clock>,
    log_factory: Option<Arc<dyn BuildLogFactory>>,
    state_store: Option<Arc<StateStore>>,
    channel_factory: Option<Arc<dyn ChannelFactory>>,
    events: Option<EventBus>,
}

impl Default for TomlConfigurationService {
    fn default() -> Self {
        Self::new()
    }
}

impl TomlConfigurationService {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            log_factory: None,
            state_store: None,
            channel_factory: None,
            events: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_log_factory(mut self, factory: Arc<dyn BuildLogFactory>) -> Self {
        self.log_factory = Some(factory);
        self
    }

    pub fn with_state_store(mut self, store: Arc<StateStore>) -> Self {
        self.state_store = Some(store);
        self
    }

    pub fn with_channel_factory(mut self, factory: Arc<dyn ChannelFactory>) -> Self {
        self.channel_factory = Some(factory);
        self
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Build a server from already parsed definitions
    pub fn build(&self, config: &ConfigDef) -> Result<Arc<Server>, ConfigError> {
        let mut items = Vec::new();
        for queue in &config.queues {
            items.push(ServerItem::from(self.build_queue(queue)?));
        }
        for project in &config.projects {
            items.push(ServerItem::from(self.build_project(project)?));
        }

        let server = Server::new(config.server.name.clone(), items);
        for def in &config.server.channels {
            match &self.channel_factory {
                Some(factory) => server.add_channel(factory.create(def)?),
                None => tracing::warn!(?def, "no channel factory configured, channel ignored"),
            }
        }
        Ok(server)
    }

    fn build_queue(&self, def: &QueueDef) -> Result<Arc<Queue>, ConfigError> {
        let mut children = Vec::new();
        for project in &def.projects {
            children.push(ServerItem::from(self.build_project(project)?));
        }
        for nested in &def.queues {
            children.push(ServerItem::from(self.build_queue(nested)?));
        }
        Ok(Queue::with_allowed_active(
            def.name.clone(),
            def.allowed_active,
            children,
        ))
    }

    fn build_project(&self, def: &ProjectDef) -> Result<Arc<Project>, ConfigError> {
        let mut builder = Project::builder(def.name.clone())
            .clock(Arc::clone(&self.clock))
            .poll_interval(Duration::from_millis(def.poll_interval_ms));
        for task in &def.tasks {
            builder = builder.task(build_task(task)?);
        }
        for trigger in &def.triggers {
            builder = match trigger {
                TriggerDef::Interval { seconds } => builder.trigger(IntervalTrigger::new(
                    Duration::from_secs(*seconds),
                    Arc::clone(&self.clock),
                )),
            };
        }
        if let Some(factory) = &self.log_factory {
            builder = builder.log_factory(Arc::clone(factory));
        }
        if let Some(store) = &self.state_store {
            builder = builder.state_store(Arc::clone(store));
        }
        if let Some(events) = &self.events {
            builder = builder.events(events.clone());
        }
        Ok(builder.build())
    }
}

impl ConfigurationService for TomlConfigurationService {
    fn load(&self, reader: &mut dyn Read) -> Result<Arc<Server>, ConfigError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let config = parse_config(&content)?;
        let server = self.build(&config)?;
        tracing::info!(
            server = %server.name(),
            projects = server.list_projects().len(),
            "configuration loaded"
        );
        Ok(server)
    }
}

fn build_task(def: &TaskDef) -> Result<Arc<Task>, ConfigError> {
    let mut task = match def {
        TaskDef::Comment { text, .. } => Task::new(Comment::new(text.clone())),
        TaskDef::Exec {
            executable,
            args,
            working_dir,
            ..
        } => {
            let mut exec = Exec::new(executable.clone()).with_args(args.iter().cloned());
            if let Some(dir) = working_dir {
                exec = exec.with_working_dir(dir.clone());
            }
            Task::new(exec)
        }
        TaskDef::Sequential { tasks, .. } => {
            let children = tasks.iter().map(build_task).collect::<Result<Vec<_>, _>>()?;
            Task::new(Sequential::new(children))
        }
    };
    if let Some(name) = def.name() {
        task = task.with_name(name);
    }
    for condition in def.conditions() {
        task = task.with_condition(build_condition(condition)?);
    }
    Ok(Arc::new(task))
}

fn build_condition(def: &ConditionDef) -> Result<StatusCondition, ConfigError> {
    let (status, negate) = match def {
        ConditionDef::Status { status } => (status, false),
        ConditionDef::NotStatus { status } => (status, true),
    };
    let parsed = IntegrationStatus::parse(status)
        .ok_or_else(|| ConfigError::InvalidFormat(format!("unknown status '{}'", status)))?;
    Ok(if negate {
        StatusCondition::not_equals(parsed)
    } else {
        StatusCondition::equals(parsed)
    })
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
