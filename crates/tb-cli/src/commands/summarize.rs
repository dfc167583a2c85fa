//! Summarize command

use std::path::Path;

use colored::Colorize;
use tb_core::{EventTally, SyncDirProcessor, walk_package};

use super::{print_json, stats_config};
use crate::cli::GlobalOptions;
use crate::error::Result;

/// Run the summarize command
pub fn run_summarize(root: &Path, options: &GlobalOptions) -> Result<()> {
    let config = stats_config(options)?;
    let mut processor = SyncDirProcessor::from_config(EventTally::new(), &config);
    walk_package(root, &config, &mut processor)?;
    let tally = processor.into_sink();

    if options.json {
        return print_json(&tally);
    }

    for (device, counts) in &tally.devices {
        println!("{}", device.cyan().bold());
        println!("  {:<22} {}", "talking books", counts.talking_books);
        println!("  {:<22} {}", "log files", counts.log_files);
        println!("  {:<22} {}", "flash images", counts.flash_images);
        println!("  {:<22} {}", "corrupt flash images", counts.corrupt_flash_images);
        println!("  {:<22} {}", "stats files", counts.stats_files);
        println!("  {:<22} {}", "corrupt stats files", counts.corrupt_stats_files);
        for (kind, count) in &counts.events {
            println!("  {:<22} {}", kind.dimmed(), count);
        }
    }
    if tally.devices.is_empty() {
        println!("{}", "No sync directories found".dimmed());
    }
    Ok(())
}
