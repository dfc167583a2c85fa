use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tb_fs::{RobustnessConfig, TreePath};

use super::ValidationError;

/// Repairs the findings that have a safe mechanical fix.
///
/// Empty sync directories are removed, then misplaced ones are moved to
/// where their ledger row says they belong. Everything else is handed back
/// unresolved, as is any repair that fails. Running it again over the same
/// findings resolves the same ones.
#[derive(Debug, Clone, Default)]
pub struct DirectoryCorruptionFixer {
    robustness: RobustnessConfig,
}

impl DirectoryCorruptionFixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_robustness(robustness: RobustnessConfig) -> Self {
        Self { robustness }
    }

    /// Apply what can be fixed; return the rest.
    pub fn fix(&self, errors: Vec<ValidationError>) -> Vec<ValidationError> {
        let (empties, others): (Vec<_>, Vec<_>) = errors
            .into_iter()
            .partition(|e| matches!(e, ValidationError::EmptySyncDirectory { .. }));

        let mut unresolved = Vec::new();
        for error in empties {
            if let ValidationError::EmptySyncDirectory { path } = &error
                && !remove_empty(path)
            {
                unresolved.push(error);
            }
        }

        for error in others {
            let resolved = match &error {
                ValidationError::InvalidSyncDirPath { path, expected, .. } => {
                    self.relocate(path, expected)
                }
                _ => false,
            };
            if !resolved {
                unresolved.push(error);
            }
        }
        unresolved
    }

    fn relocate(&self, from: &Path, to: &Path) -> bool {
        if !from.exists() && to.exists() {
            return true;
        }

        if let Some(parent) = to.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            tracing::error!(path = %parent.display(), error = %e, "Cannot create directory");
            return false;
        }

        match tb_fs::io::rename(from, to, self.robustness) {
            Ok(()) => {
                tracing::info!(from = %from.display(), to = %to.display(), "Moved sync directory");
                true
            }
            Err(_) if to.join(TreePath::ChkdskMarker.as_str()).exists() => {
                tracing::debug!(to = %to.display(), "Destination is a reformat recovery; leaving source");
                true
            }
            Err(e) if to.exists() => {
                tracing::error!(from = %from.display(), to = %to.display(), error = %e, "Destination already exists");
                false
            }
            Err(e) => {
                tracing::error!(from = %from.display(), to = %to.display(), error = %e, "Cannot move sync directory");
                false
            }
        }
    }
}

fn remove_empty(path: &Path) -> bool {
    match fs::remove_dir(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Removed empty sync directory");
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Cannot remove empty sync directory");
            false
        }
    }
}
