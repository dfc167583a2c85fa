//! Validate and fix commands

use std::path::Path;

use colored::Colorize;
use tb_core::ValidationError;
use tb_core::validation;

use super::{print_json, stats_config};
use crate::cli::GlobalOptions;
use crate::error::{CliError, Result};

/// Run the validate command
pub fn run_validate(root: &Path, options: &GlobalOptions) -> Result<()> {
    let config = stats_config(options)?;
    let findings = validation::validate(root, &config)?;
    report(root, &findings, options.json, "No problems found")
}

/// Run the fix command
pub fn run_fix(root: &Path, options: &GlobalOptions) -> Result<()> {
    let config = stats_config(options)?;
    let unresolved = validation::fix_up_with_config(root, &config)?;
    report(root, &unresolved, options.json, "Everything found was repaired")
}

fn report(root: &Path, findings: &[ValidationError], json: bool, clean: &str) -> Result<()> {
    if json {
        print_json(findings)?;
    } else if findings.is_empty() {
        println!("{} {}", "OK".green().bold(), clean);
    } else {
        println!("{} {}", "Findings for".bold(), root.display());
        println!();
        for finding in findings {
            println!(
                "  {:>2} {:<28} {}",
                finding.id(),
                finding.name().yellow(),
                finding
            );
        }
        println!();
    }

    if findings.is_empty() {
        Ok(())
    } else {
        Err(CliError::Findings {
            count: findings.len(),
        })
    }
}
