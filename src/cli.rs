// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `planrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "planrun",
    version,
    about = "Run groups of shell tasks from a declarative plan.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the plan file (YAML).
    ///
    /// Default: `planrun.yaml` in the current working directory.
    #[arg(short, long, value_name = "PATH", default_value = "planrun.yaml")]
    pub config: String,

    /// Tasks to run: `all`, or whitespace-separated regexes matched against
    /// task commands.
    #[arg(short, long, value_name = "TASKS", default_value = "all")]
    pub tasks: String,

    /// Override the plan's global mode (waitall, waitcurrent, failfast,
    /// runalways).
    ///
    /// If omitted, a non-empty `PLANRUN_MODE` environment variable is used,
    /// then the plan's own mode.
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PLANRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
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
