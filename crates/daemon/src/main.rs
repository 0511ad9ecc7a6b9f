// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Continuous integration daemon (ccnetd)
//!
//! Loads a server tree from a configuration file, starts its projects and
//! serves remote actions until told to stop.

use std::path::PathBuf;
use std::process::ExitCode;

use ccnet_config::DEFAULT_CONFIG_FILE;
use ccnet_daemon::lifecycle::{self, Config, LifecycleError};
use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "ccnetd", version, about = "Continuous integration server")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Check the configuration and exit
    #[arg(long)]
    validate: bool,

    /// Log to stderr instead of the log file
    #[arg(long)]
    foreground: bool,
}

/// Startup marker prefix written to the log before anything else.
/// Full format: "--- ccnetd: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- ccnetd: starting (pid: ";

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.validate {
        return Ok(run_validate(&args));
    }

    let config = Config::load(&args.config)?;

    let log_guard = if args.foreground {
        setup_stderr_logging();
        None
    } else {
        write_startup_marker(&config)?;
        Some(setup_logging(&config)?)
    };

    info!("Starting ccnetd with configuration: {}", config.config_path.display());

    let startup_config = config.clone();
    let handle = tokio::runtime::Handle::current();
    let started =
        tokio::task::spawn_blocking(move || lifecycle::startup(&startup_config, handle)).await?;
    let daemon = match started {
        Ok(daemon) => daemon,
        Err(e) => {
            // Tracing is non-blocking and may not flush before exit
            write_startup_error(&config, &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!("Daemon ready");
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
    }

    tokio::task::spawn_blocking(move || daemon.shutdown()).await??;

    info!("Daemon stopped");
    Ok(ExitCode::SUCCESS)
}

fn run_validate(args: &Args) -> ExitCode {
    let report = lifecycle::validate(&args.config);
    for entry in &report.entries {
        eprintln!("{:?}: {}", entry.severity, entry.message());
    }
    match report.error {
        None => {
            println!("Configuration is valid");
            ExitCode::SUCCESS
        }
        Some(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Append the startup marker so a reader can find where this run begins
fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    use std::io::Write;

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    writeln!(file, "{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id())?;
    Ok(())
}

fn write_startup_error(config: &Config, error: &LifecycleError) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*};

    let dir = config
        .log_path
        .parent()
        .ok_or_else(|| LifecycleError::NoLogDir(config.log_path.clone()))?;
    let file_name = config
        .log_path
        .file_name()
        .ok_or_else(|| LifecycleError::NoLogDir(config.log_path.clone()))?;
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}

fn setup_stderr_logging() {
    use tracing_subscriber::{fmt, prelude::*};

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
