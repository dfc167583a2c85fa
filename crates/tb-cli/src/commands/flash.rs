//! Flash command

use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use tb_formats::FlashData;
use tb_formats::flash::{MessageStats, SystemData};

use super::print_json;
use crate::cli::GlobalOptions;
use crate::error::{CliError, Result};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlashReport<'a> {
    system_data: &'a SystemData,
    problems: Vec<String>,
    stats: Vec<MessageStats>,
}

/// Run the flash command
pub fn run_flash(file: &Path, options: &GlobalOptions) -> Result<()> {
    let bytes = tb_fs::io::read_bytes(file)?;
    let flash = FlashData::decode(&bytes).map_err(|source| CliError::Corrupt {
        path: file.to_path_buf(),
        source,
    })?;

    let report = FlashReport {
        system_data: flash.system_data(),
        problems: flash.is_valid(),
        stats: flash.all_stats(),
    };
    if options.json {
        return print_json(&report);
    }

    let system = report.system_data;
    println!("{}:  {}", "Serial".dimmed(), system.serial_number.cyan());
    println!("{}:  {}", "Update".dimmed(), system.update_number);
    println!("{}: {}", "Village".dimmed(), system.location);
    println!("{}: {}", "Package".dimmed(), system.content_package);
    println!();

    if report.problems.is_empty() {
        println!("{}", "Image is valid".green());
    } else {
        for problem in &report.problems {
            println!("{} {}", "warning:".yellow().bold(), problem);
        }
    }
    println!();

    println!("{:<24} {:>8} {:>10} {:>8}", "content".bold(), "started", "completed", "seconds");
    for row in &report.stats {
        println!(
            "{:<24} {:>8} {:>10} {:>8}",
            row.content_id.as_deref().unwrap_or("-"),
            row.count_started,
            row.count_completed,
            row.total_seconds_played
        );
    }
    Ok(())
}
