//! Reconciliation of sync directories against loader ledgers.

mod allowed;
mod findings;
mod fixer;
mod validator;

use std::path::Path;

pub use allowed::AllowedNames;
pub use findings::{PropertyDiff, UnmatchedEntry, ValidationError};
pub use fixer::DirectoryCorruptionFixer;
pub use validator::ValidatingVisitor;

use crate::Result;
use crate::config::StatsConfig;
use crate::model::DirectoryFormat;
use crate::navigator;

/// Validate every processing root below `root` and return every finding.
pub fn validate(root: &Path, config: &StatsConfig) -> Result<Vec<ValidationError>> {
    let mut visitor = ValidatingVisitor::from_config(config);
    navigator::walk_package(root, config, &mut visitor)?;
    Ok(visitor.into_errors())
}

/// Validate the tree at `root`, repair what can be repaired, and return the
/// findings still outstanding.
pub fn fix_up(
    root: &Path,
    format: Option<DirectoryFormat>,
    strict: bool,
) -> Result<Vec<ValidationError>> {
    let config = StatsConfig {
        format,
        strict,
        ..StatsConfig::default()
    };
    fix_up_with_config(root, &config)
}

pub fn fix_up_with_config(root: &Path, config: &StatsConfig) -> Result<Vec<ValidationError>> {
    let errors = validate(root, config)?;
    tracing::info!(root = %root.display(), findings = errors.len(), "Validation complete; fixing");
    Ok(DirectoryCorruptionFixer::new().fix(errors))
}
