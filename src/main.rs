//! support-agent command-line entry point.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use support_agent::cli::{Cli, execute};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries answers only.
    let filter = if cli.verbose {
        EnvFilter::new("support_agent=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("support_agent=warn"))
    };
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")?;

    let output = execute(&cli)?;
    if !output.is_empty() {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{output}")?;
        stdout.flush()?;
    }
    Ok(())
}
