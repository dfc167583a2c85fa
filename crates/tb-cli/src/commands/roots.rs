//! Roots command

use std::path::Path;

use tb_core::navigator::detect_roots;
use tb_fs::NormalizedPath;

use super::print_json;
use crate::cli::GlobalOptions;
use crate::error::Result;

/// Run the roots command
///
/// Roots are printed canonical and with forward slashes, so a listing made
/// on a loader laptop can be pasted into a run elsewhere.
pub fn run_roots(dir: &Path, options: &GlobalOptions) -> Result<()> {
    let roots: Vec<String> = detect_roots(dir)?
        .iter()
        .map(|root| {
            NormalizedPath::canonical(root)
                .unwrap_or_else(|_| NormalizedPath::new(root))
                .to_string()
        })
        .collect();

    if options.json {
        return print_json(&roots);
    }
    for root in roots {
        println!("{root}");
    }
    Ok(())
}
