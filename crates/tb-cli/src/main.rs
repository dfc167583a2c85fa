//! tbstats
//!
//! Command-line front end for validating, repairing and summarising
//! talking-book statistics trees.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.options.verbose)?;

    let options = &cli.options;
    match cli.command {
        Commands::Validate { root } => commands::run_validate(&root, options),
        Commands::Fix { root } => commands::run_fix(&root, options),
        Commands::Manifest { root, write } => commands::run_manifest(&root, write, options),
        Commands::Summarize { root } => commands::run_summarize(&root, options),
        Commands::Flash { file } => commands::run_flash(&file, options),
        Commands::Merge { src, dest } => commands::run_merge(&src, &dest, options),
        Commands::Roots { dir } => commands::run_roots(&dir, options),
    }
}

/// Logs go to stderr so `--json` output stays machine-readable.
fn init_tracing(verbose: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = if verbose {
        builder.with_max_level(Level::DEBUG).try_init()
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        builder.with_env_filter(filter).try_init()
    };
    installed.map_err(|e| CliError::user(format!("cannot install logger: {e}")))?;

    tracing::debug!("Verbose mode enabled");
    Ok(())
}
