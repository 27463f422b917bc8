// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::export::ExportFormat;

/// Command-line arguments for `depgraph`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "depgraph",
    version,
    about = "Inspect dependency graphs: execution order, readiness and cycles.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the workflow file (TOML) or a JSON snapshot.
    ///
    /// Default: `Depgraph.toml` in the current working directory.
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEPGRAPH_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print a topological order, one node id per line.
    Order,

    /// Report structural problems; exits non-zero if the graph has a cycle.
    Validate,

    /// Print nodes whose dependencies are all completed.
    Ready(ReadyArgs),

    /// Print execution waves, one wave per line.
    Waves,

    /// Export the graph as a JSON snapshot (or DOT with `--format dot`).
    Export(ExportArgs),

    /// Print the graph as Graphviz DOT.
    Dot,
}

#[derive(Debug, Clone, Args)]
pub struct ReadyArgs {
    /// Completed node ids, comma separated.
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub completed: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Write to this file instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub out: Option<String>,

    #[arg(long, value_name = "FORMAT", default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
