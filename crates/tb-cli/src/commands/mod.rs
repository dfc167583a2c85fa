//! Command implementations for tb-cli

pub mod flash;
pub mod manifest;
pub mod merge;
pub mod roots;
pub mod summarize;
pub mod validate;

pub use flash::run_flash;
pub use manifest::run_manifest;
pub use merge::run_merge;
pub use roots::run_roots;
pub use summarize::run_summarize;
pub use validate::{run_fix, run_validate};

use serde::Serialize;
use tb_core::StatsConfig;

use crate::cli::GlobalOptions;
use crate::error::Result;

/// The config file named on the command line, with the command-line flags
/// layered on top.
pub fn stats_config(options: &GlobalOptions) -> Result<StatsConfig> {
    let mut config = match &options.config {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading configuration");
            StatsConfig::load(path)?
        }
        None => StatsConfig::default(),
    };
    if options.format.is_some() {
        config.format = options.format;
    }
    config.strict |= options.strict;
    Ok(config)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
