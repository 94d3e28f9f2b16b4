//! ctxlog CLI Binary
//!
//! Emits structured records and re-renders compact JSON lines as trees.

use anyhow::Context;
use clap::Parser;
use ctxlog::cli::{command_name, map_error, Cli, RunContext};
use ctxlog::diagnostics::{init_diagnostics, DiagnosticsConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let context = RunContext::new(
        cli.root.clone(),
        cli.config.clone(),
        cli.env.clone(),
        cli.no_color,
    )
    .map_err(|e| anyhow::anyhow!(map_error(&e)))
    .context("Failed to load configuration")?;

    if let Some(diagnostics) = diagnostics_config(&cli, context.config().diagnostics.clone()) {
        init_diagnostics(&diagnostics).context("Failed to initialize diagnostics")?;
    }

    let command = command_name(&cli.command);
    info!(command, "ctxlog CLI starting");

    match context.execute(&cli.command) {
        Ok(output) => {
            info!(command, "Command completed successfully");
            if let Some(output) = output {
                println!("{}", output);
            }
            Ok(())
        }
        Err(e) => {
            error!(command, error = %e, "Command failed");
            Err(anyhow::anyhow!(map_error(&e)))
        }
    }
}

/// Diagnostics are off unless `--verbose` is given; verbose raises the level to debug.
fn diagnostics_config(cli: &Cli, mut config: DiagnosticsConfig) -> Option<DiagnosticsConfig> {
    if !cli.verbose {
        return None;
    }
    config.level = "debug".to_string();
    Some(config)
}
