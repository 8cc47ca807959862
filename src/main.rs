// src/main.rs
use breach_monitor::cli::Cli;
use breach_monitor::config::Config;
use breach_monitor::delay;
use breach_monitor::monitor::{BreachMonitor, RunOutcome};
use breach_monitor::output::HumanOutput;
use breach_monitor::progress::ProgressIndicator;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Conventional exit status for a process stopped by SIGINT
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Validate arguments
    cli.validate()?;

    // Load config file, if any
    let config = Config::load(cli.config.as_deref())?;

    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level(&config.logging.level)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting breach-monitor...");

    let progress = ProgressIndicator::new(cli.should_show_progress());
    let mut monitor = BreachMonitor::from_cli(&cli, &config, HumanOutput::stdout())?
        .with_progress(progress);

    let mut shutdown = delay::shutdown_on_ctrl_c();

    match monitor.run(&mut shutdown).await? {
        RunOutcome::Completed => Ok(ExitCode::SUCCESS),
        RunOutcome::Interrupted => Ok(ExitCode::from(EXIT_INTERRUPTED)),
    }
}
