//! Manifest command

use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use tb_core::navigator::package_roots;
use tb_core::{DirectoryFormat, DirectoryNavigator, StatsPackageManifest};

use super::{print_json, stats_config};
use crate::cli::GlobalOptions;
use crate::error::Result;

/// Run the manifest command
///
/// Each processing root below `root` gets its own manifest.
pub fn run_manifest(root: &Path, write: bool, options: &GlobalOptions) -> Result<()> {
    let config = stats_config(options)?;

    let mut resolved = Vec::new();
    for dir in package_roots(root)? {
        let navigator = DirectoryNavigator::from_config(&dir, &config);
        let (format, mut manifest) = navigator.resolve_manifest()?;
        if write {
            manifest = navigator.generate_manifest(format)?;
            manifest.save(&dir)?;
            tracing::info!(root = %dir.display(), "Wrote manifest");
        }
        resolved.push((dir, format, manifest));
    }

    if options.json {
        return match resolved.as_slice() {
            [(_, _, manifest)] => print_json(manifest),
            _ => print_json(
                &resolved
                    .iter()
                    .map(|(dir, _, manifest)| (dir.display().to_string(), manifest))
                    .collect::<BTreeMap<_, _>>(),
            ),
        };
    }

    let several = resolved.len() > 1;
    for (dir, format, manifest) in &resolved {
        if several {
            println!("{}", dir.display().to_string().bold());
        }
        print_manifest(dir, *format, manifest, write);
        if several {
            println!();
        }
    }
    Ok(())
}

fn print_manifest(dir: &Path, format: DirectoryFormat, manifest: &StatsPackageManifest, write: bool) {
    println!("{}:  {}", "Format".dimmed(), format.to_string().cyan());
    println!("{}: {}", "Devices".dimmed(), manifest.devices.len());
    for (device, range) in &manifest.devices {
        let marker = if range.incomplete {
            " (incomplete)".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} {} .. {}{}",
            device.green(),
            range.start_time,
            range.end_time,
            marker
        );
    }
    if write {
        println!();
        println!("{} {}", "Wrote".green().bold(), StatsPackageManifest::path(dir).display());
    }
}
