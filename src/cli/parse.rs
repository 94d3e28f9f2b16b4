//! CLI parse: clap types for ctxlog. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ctxlog CLI - emit and pretty-print structured log records
#[derive(Parser)]
#[command(name = "ctxlog")]
#[command(about = "Emit structured log records and render compact JSON lines as trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root searched for ctxlog.toml
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Formatter environment (pro, dev); overrides configuration
    #[arg(long)]
    pub env: Option<String>,

    /// Disable colors in tree output
    #[arg(long)]
    pub no_color: bool,

    /// Enable diagnostics on stderr (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Emit one record through a configured emitter
    Emit {
        /// Severity (debug, info, warning, error, critical)
        #[arg(long, default_value = "info")]
        level: String,
        /// Record message
        #[arg(long)]
        message: String,
        /// Emitter name
        #[arg(long, default_value = "ctxlog")]
        name: String,
        /// Context fields as key=value; values parse as JSON when possible
        fields: Vec<String>,
    },
    /// Read compact JSON lines from stdin and render them as trees
    Pretty {
        /// Source name shown in headers
        #[arg(long)]
        name: Option<String>,
    },
    /// Show the effective configuration
    Config {
        /// Output format (toml or json)
        #[arg(long, default_value = "toml")]
        format: String,
    },
}
