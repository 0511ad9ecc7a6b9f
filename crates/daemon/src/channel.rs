// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unix socket communications channel

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ccnet_adapters::{ActionDispatcher, Channel, TracedChannel};
use ccnet_config::{ChannelDef, ConfigError};
use ccnet_engine::ChannelFactory;
use thiserror::Error;
use tokio::net::{UnixListener, UnixStream};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::protocol::{self, ProtocolError, Request, Response, DEFAULT_TIMEOUT};

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to bind {0}: {1}")]
    Bind(PathBuf, std::io::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Serves the action dispatcher over a Unix socket.
///
/// The listener runs on the runtime behind `handle`, so the channel can be
/// opened from synchronous code.
pub struct SocketChannel {
    path: PathBuf,
    handle: Handle,
    accept: Mutex<Option<JoinHandle<()>>>,
}

impl SocketChannel {
    pub fn new(path: impl Into<PathBuf>, handle: Handle) -> Self {
        Self {
            path: path.into(),
            handle,
            accept: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn bind(&self) -> Result<UnixListener, ChannelError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Stale socket from an earlier run
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        let listener = std::os::unix::net::UnixListener::bind(&self.path)
            .map_err(|e| ChannelError::Bind(self.path.clone(), e))?;
        listener.set_nonblocking(true)?;

        let _runtime = self.handle.enter();
        Ok(UnixListener::from_std(listener)?)
    }
}

impl Channel for SocketChannel {
    fn name(&self) -> &str {
        "socket"
    }

    fn initialise(&self, dispatcher: Arc<dyn ActionDispatcher>) -> bool {
        let listener = match self.bind() {
            Ok(listener) => listener,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "unable to open socket");
                return false;
            }
        };

        let task = self.handle.spawn(accept_loop(listener, dispatcher));
        if let Some(previous) = self
            .accept
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(task)
        {
            previous.abort();
        }
        true
    }

    fn clean_up(&self) {
        if let Some(task) = self.accept.lock().unwrap_or_else(|e| e.into_inner()).take() {
            task.abort();
        }
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "unable to remove socket");
            }
        }
    }
}

async fn accept_loop(listener: UnixListener, dispatcher: Arc<dyn ActionDispatcher>) {
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let dispatcher = Arc::clone(&dispatcher);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, dispatcher).await {
                        error!("Error handling connection: {}", e);
                    }
                });
            }
            Err(e) => error!("Error accepting connection: {}", e),
        }
    }
}

/// Handle a single client connection
pub async fn handle_connection(
    stream: UnixStream,
    dispatcher: Arc<dyn ActionDispatcher>,
) -> Result<(), ChannelError> {
    let (mut reader, mut writer) = stream.into_split();

    let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(request) => request,
        Err(ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected before sending request");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    debug!(?request, "received request");

    let response = handle_request(request, dispatcher).await;

    debug!(?response, "sending response");
    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;
    Ok(())
}

/// Dispatcher calls may block on project state, so they run off the reactor
async fn handle_request(request: Request, dispatcher: Arc<dyn ActionDispatcher>) -> Response {
    let outcome = tokio::task::spawn_blocking(move || match request {
        Request::Ping => Response::Pong,
        Request::ServerName => Response::ServerName {
            name: dispatcher.server_name(),
        },
        Request::List { urn } => match dispatcher.list(&urn) {
            Ok(actions) => Response::Actions { actions },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },
        Request::Invoke { urn, action } => match dispatcher.invoke(&urn, &action) {
            Ok(response) => Response::Invoked { response },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },
    })
    .await;

    outcome.unwrap_or_else(|e| Response::Error {
        message: format!("request handler failed: {}", e),
    })
}

/// Builds traced socket channels for `kind = "socket"` entries
pub struct SocketChannelFactory {
    default_path: PathBuf,
    handle: Handle,
}

impl SocketChannelFactory {
    pub fn new(default_path: impl Into<PathBuf>, handle: Handle) -> Self {
        Self {
            default_path: default_path.into(),
            handle,
        }
    }
}

impl ChannelFactory for SocketChannelFactory {
    fn create(&self, def: &ChannelDef) -> Result<Arc<dyn Channel>, ConfigError> {
        match def {
            ChannelDef::Socket { path } => {
                let path = path.clone().unwrap_or_else(|| self.default_path.clone());
                Ok(Arc::new(TracedChannel::new(SocketChannel::new(
                    path,
                    self.handle.clone(),
                ))))
            }
        }
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
