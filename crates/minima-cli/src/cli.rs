//! CLI argument definitions.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::{PlansArgs, RunArgs, SurfaceArgs, SweepArgs, TraceArgs};

/// Minima - Gradient descent and trust-region experiments on a multimodal surface
#[derive(Parser)]
#[command(name = "minima")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress headers, summaries and log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run one optimizer from one start point
    Run(RunArgs),

    /// Run experiment plans (built-in or from a config file)
    Sweep(SweepArgs),

    /// Show every trust-region iteration of a single run
    Trace(TraceArgs),

    /// Sample the objective on a regular grid
    Surface(SurfaceArgs),

    /// Print the built-in plans as a config template
    Plans(PlansArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the key value)
    Minimal,
}
