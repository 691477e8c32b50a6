//! Minima CLI - Optimizer experiments on the cosine-bowl surface.
//!
//! # Usage
//!
//! ```bash
//! # Gradient descent from (1, 1) with a fixed step
//! minima run gd --step-size 0.05
//!
//! # Trust region from (2, 2)
//! minima run tr --x0 2 --y0 2 --radius 1.0
//!
//! # Run every built-in plan, or one of them as CSV
//! minima sweep
//! minima sweep --plan radius --format csv
//!
//! # Write the built-in plans as a config template, edit it, run it
//! minima plans --output lab.toml
//! minima sweep --config lab.toml
//!
//! # Per-iteration trust-region diagnostics
//! minima trace --x0 2 --y0 2
//!
//! # Sample the objective for plotting
//! minima surface --resolution 41 --format csv > surface.csv
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};
use output::Output;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let out = Output {
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Run(args) => commands::run::execute(args, out)?,
        Commands::Sweep(args) => commands::sweep::execute(args, out)?,
        Commands::Trace(args) => commands::trace::execute(args, out)?,
        Commands::Surface(args) => commands::surface::execute(args, out)?,
        Commands::Plans(args) => commands::plans::execute(args, out)?,
    }

    Ok(())
}

/// Logs go to stderr so table, JSON and CSV output stay clean.
fn init_tracing(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
