//! Run configuration.

use std::path::Path;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tb_fs::{ConfigStore, NormalizedPath};
use tb_formats::CategoryMap;

use crate::Result;
use crate::model::DirectoryFormat;
use crate::validation::AllowedNames;

/// Settings for one processing run, loadable from TOML, JSON or YAML.
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Turn structural problems into errors instead of logging a best guess.
    pub strict: bool,
    /// Layout to assume when a root has no manifest.
    pub format: Option<DirectoryFormat>,
    /// How long after a legacy sync directory's time its ledger row may be
    /// written.
    pub match_window_minutes: i64,
    /// Decode a talking book's firmware image once, from its earliest sync.
    pub firmware_first_wins: bool,
    /// Write a manifest generated for a root without one back to disk.
    pub persist_generated_manifest: bool,
    pub categories: CategoryMap,
    /// Names accepted for deployments, villages and talking books.
    pub allowed: Option<AllowedNames>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            strict: false,
            format: None,
            match_window_minutes: 10,
            firmware_first_wins: true,
            persist_generated_manifest: false,
            categories: CategoryMap::default(),
            allowed: None,
        }
    }
}

impl StatsConfig {
    /// Load from `path`, choosing the parser by extension.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(ConfigStore::new().load(&NormalizedPath::new(path))?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        ConfigStore::new().save(&NormalizedPath::new(path), self)?;
        Ok(())
    }

    pub fn match_window(&self) -> TimeDelta {
        TimeDelta::minutes(self.match_window_minutes)
    }
}
