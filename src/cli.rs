// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `prefab-index`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "prefab-index",
    version,
    about = "Find which scene/prefab files reference a script.",
    long_about = None
)]
pub struct CliArgs {
    /// Workspace root. Defaults to the current working directory.
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Path to the settings file (TOML).
    ///
    /// Default: `PrefabIndex.toml` in the workspace root, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override `[settings].export_name`.
    #[arg(long, value_name = "KEY")]
    pub export_name: Option<String>,

    /// Override `[settings].container_root`.
    #[arg(long, value_name = "DIR")]
    pub container_root: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PREFAB_INDEX_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print settings, but don't scan anything.
    #[arg(long)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Build the index once and print a summary.
    Scan,
    /// Build the index and list containers referencing a script file.
    Find {
        /// The script source file (e.g. `assets/scripts/Player.ts`).
        script: PathBuf,

        /// Print only the name each hit would be copied as.
        #[arg(long)]
        names: bool,
    },
    /// Build the index, keep it current, and answer queries read from stdin.
    Watch,
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
