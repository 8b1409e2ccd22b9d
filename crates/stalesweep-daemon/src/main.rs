//! stalesweep daemon
//!
//! Sweeps the configured directory trees on a fixed interval until it
//! receives Ctrl+C or SIGTERM.

use anyhow::Context;
use clap::Parser;
use stalesweep_daemon::{logging, signal, Cli, DaemonConfig};
use stalesweep_janitor::CleanupScheduler;
use std::process;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = DaemonConfig::from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let _log_guard = logging::init(&config.logging)
        .with_context(|| format!("opening log file {}", config.logging.file.display()))?;

    tracing::info!(
        config = %cli.config.display(),
        level = %config.logging.level,
        "stalesweep starting"
    );

    let mut scheduler = CleanupScheduler::new(config.janitor);

    if cli.once {
        let metrics = scheduler.run_once().await?;
        tracing::info!("Single sweep finished:\n{}", metrics.summary());
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    let listener =
        signal::spawn_listener(shutdown.clone()).context("installing signal handlers")?;

    scheduler.start()?;
    tracing::info!("Cleanup scheduler running. Waiting for tasks...");

    shutdown.cancelled().await;

    match scheduler.stop().await {
        Ok(()) => tracing::info!("Scheduler shut down successfully"),
        Err(e) => tracing::error!("Error while stopping cleanup scheduler: {}", e),
    }
    if let Err(e) = listener.await {
        tracing::error!("Signal listener failed: {}", e);
    }

    Ok(())
}
