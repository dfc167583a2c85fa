//! Merge command

use std::path::Path;

use colored::Colorize;
use tb_core::merge::merge_into;

use super::{print_json, stats_config};
use crate::cli::GlobalOptions;
use crate::error::Result;

/// Run the merge command
pub fn run_merge(src: &Path, dest: &Path, options: &GlobalOptions) -> Result<()> {
    let config = stats_config(options)?;
    let summary = merge_into(src, dest, &config)?;

    if options.json {
        return print_json(&summary);
    }

    println!(
        "{} {} into {}",
        "Merged".green().bold(),
        src.display(),
        dest.display()
    );
    println!("  {:<16} {}", "deployments", summary.deployments);
    println!("  {:<16} {}", "files", summary.files);
    println!("  {:<16} {}", "ledgers", summary.ledgers);
    println!("  {:<16} {}", "loader logs", summary.tbloader_logs);
    Ok(())
}
