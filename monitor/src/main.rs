//! dropwatch - SCUM cargo drop announcer.
//!
//! Follows the game server log for cargo drop spawns and restart notices,
//! watches the server process, and posts drop notifications to Discord.
//!
//! Usage: dropwatch [--config <file>] [--log-path <file>] ...
//! (every flag can also be given through its environment variable)

mod config;
mod discord;
mod logging;

use std::sync::Arc;

use clap::Parser;
use dropwatch_core::reader::DEFAULT_IDLE_INTERVAL;
use dropwatch_core::{
    DropTracker, FollowError, LogFollower, LogParser, Messages, ProcessWatchdog, SectorMap,
    SettingsError, SystemProbe, read_drop_timings,
};
use dropwatch_types::MonitorConfig;
use thiserror::Error;

use crate::config::{Cli, ConfigError, Settings};
use crate::discord::Outbound;

#[derive(Debug, Error)]
enum MonitorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Log(#[from] FollowError),

    #[error(transparent)]
    ServerSettings(#[from] SettingsError),

    #[error("failed to build webhook client: {0}")]
    Webhook(#[from] reqwest::Error),

    #[error("{0} task stopped unexpectedly")]
    TaskStopped(&'static str),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let (mut file_config, config_warning) = match config::load(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            // Logging is not configured yet
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    config::apply_overrides(&mut file_config, &cli);

    let (log_guard, log_warning) = logging::init_logging(file_config.log_dir.as_deref());
    if let Some(warning) = log_warning {
        tracing::warn!("{}", warning);
    }
    if let Some(warning) = config_warning {
        tracing::warn!(error = %warning, "Using default configuration");
    }

    let exit_code = match run(file_config).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "dropwatch stopped");
            1
        }
    };

    // Flush the file writer before exiting
    drop(log_guard);
    std::process::exit(exit_code);
}

async fn run(monitor_config: MonitorConfig) -> Result<(), MonitorError> {
    let settings: Settings = config::validate(monitor_config)?;

    // Fatal preconditions, checked before any task starts
    let follower = LogFollower::open(&settings.log_path, DEFAULT_IDLE_INTERVAL).await?;
    let timings = read_drop_timings(&settings.server_config_path)?;
    let notifier = Arc::new(Outbound::from_config(&settings.discord)?);

    if matches!(*notifier, Outbound::Log(_)) {
        tracing::warn!("No Discord webhook configured, notifications will only be logged");
    }

    let tracker = Arc::new(DropTracker::new(
        timings,
        Arc::new(SectorMap::scum()),
        Messages::new(settings.language),
        notifier,
    ));

    let parser = LogParser::new(Arc::clone(&tracker));
    let watchdog = ProcessWatchdog::new(
        settings.process_name.clone(),
        settings.check_interval,
        Arc::clone(&tracker),
        SystemProbe,
    );

    let mut pipeline_task = tokio::spawn(parser.follow(follower));
    let mut watchdog_task = tokio::spawn(watchdog.run());

    tracing::info!(
        log = ?settings.log_path,
        process = %settings.process_name,
        language = settings.language.code(),
        ?timings,
        "dropwatch running"
    );

    let result = tokio::select! {
        _ = shutdown_signal() => {
            tracing::info!("Shutting down");
            Ok(())
        }
        joined = &mut pipeline_task => {
            tracing::error!(result = ?joined, "Log pipeline ended");
            Err(MonitorError::TaskStopped("log pipeline"))
        }
        joined = &mut watchdog_task => {
            tracing::error!(result = ?joined, "Process watchdog ended");
            Err(MonitorError::TaskStopped("process watchdog"))
        }
    };

    pipeline_task.abort();
    watchdog_task.abort();
    result
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
