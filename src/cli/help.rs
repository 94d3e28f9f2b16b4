//! CLI help: command-name contract for diagnostics.

use crate::cli::parse::Commands;

/// Command name string for diagnostics (e.g. "emit", "pretty").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Emit { .. } => "emit",
        Commands::Pretty { .. } => "pretty",
        Commands::Config { .. } => "config",
    }
}
