use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::ledger::{InvalidProperty, OperationalInfo};
use crate::model::SyncDirId;

/// A sync directory whose location disagrees with its ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDiff {
    pub field: String,
    pub expected: String,
    pub actual: String,
}

impl PropertyDiff {
    pub fn new(field: &str, expected: &str, actual: &str) -> Self {
        Self {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// A ledger row no sync directory claimed.
#[derive(Debug, Clone, Serialize)]
pub struct UnmatchedEntry {
    pub id: SyncDirId,
    pub info: OperationalInfo,
}

/// One reconciliation finding.
///
/// Findings are collected, not raised; a walk that produces them still
/// succeeds.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ValidationError {
    #[error("{} should be at {} ({})", .path.display(), .expected.display(), describe_diffs(.diffs))]
    InvalidSyncDirPath {
        path: PathBuf,
        expected: PathBuf,
        diffs: Vec<PropertyDiff>,
    },

    #[error("Sync directory name {dir_name} is not in the current format: {}", .path.display())]
    InvalidSyncDirFormat { dir_name: String, path: PathBuf },

    #[error("No ledger entry matches sync directory {dir_name} (format {format_version}): {}", .path.display())]
    NoMatchingTbDataEntry {
        dir_name: String,
        path: PathBuf,
        format_version: u8,
    },

    #[error("Ledger entry {dir_name} from {device} matches more than one sync directory")]
    MultipleTbDataMatches { dir_name: String, device: String },

    #[error("Manifest has no entry for device {device}")]
    ManifestMissingDevice { device: String },

    #[error("Device {device} synced at {sync_time}, outside its manifest range {start} to {end}: {}", .path.display())]
    DeviceDateOutOfRange {
        device: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
        sync_time: NaiveDateTime,
        path: PathBuf,
    },

    #[error("Ledger {} has {} invalid values", .file.display(), .properties.len())]
    InvalidTbDataProperties {
        file: PathBuf,
        properties: Vec<InvalidProperty>,
    },

    #[error("{} ledger entries have no sync directory", .entries.len())]
    UnmatchedTbDataEntries { entries: Vec<UnmatchedEntry> },

    #[error("Sync directory is empty: {}", .path.display())]
    EmptySyncDirectory { path: PathBuf },

    #[error("Unknown village: {village}")]
    InvalidVillageName { village: String },

    #[error("Unknown talking book: {talking_book}")]
    InvalidTalkingBookName { talking_book: String },

    #[error("Unknown deployment: {deployment}")]
    InvalidDeploymentId { deployment: String },
}

impl ValidationError {
    /// Stable numeric id for reports.
    pub fn id(&self) -> u32 {
        match self {
            Self::InvalidSyncDirPath { .. } => 1,
            Self::InvalidSyncDirFormat { .. } => 2,
            Self::NoMatchingTbDataEntry { .. } => 3,
            Self::MultipleTbDataMatches { .. } => 4,
            Self::ManifestMissingDevice { .. } => 5,
            Self::DeviceDateOutOfRange { .. } => 6,
            Self::InvalidTbDataProperties { .. } => 7,
            Self::UnmatchedTbDataEntries { .. } => 8,
            Self::EmptySyncDirectory { .. } => 9,
            Self::InvalidVillageName { .. } => 10,
            Self::InvalidTalkingBookName { .. } => 11,
            Self::InvalidDeploymentId { .. } => 12,
        }
    }

    /// Stable kebab-case name, matching the serialized `kind`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidSyncDirPath { .. } => "invalid-sync-dir-path",
            Self::InvalidSyncDirFormat { .. } => "invalid-sync-dir-format",
            Self::NoMatchingTbDataEntry { .. } => "no-matching-tb-data-entry",
            Self::MultipleTbDataMatches { .. } => "multiple-tb-data-matches",
            Self::ManifestMissingDevice { .. } => "manifest-missing-device",
            Self::DeviceDateOutOfRange { .. } => "device-date-out-of-range",
            Self::InvalidTbDataProperties { .. } => "invalid-tb-data-properties",
            Self::UnmatchedTbDataEntries { .. } => "unmatched-tb-data-entries",
            Self::EmptySyncDirectory { .. } => "empty-sync-directory",
            Self::InvalidVillageName { .. } => "invalid-village-name",
            Self::InvalidTalkingBookName { .. } => "invalid-talking-book-name",
            Self::InvalidDeploymentId { .. } => "invalid-deployment-id",
        }
    }
}

fn describe_diffs(diffs: &[PropertyDiff]) -> String {
    diffs
        .iter()
        .map(|d| format!("{}: expected {}, found {}", d.field, d.expected, d.actual))
        .collect::<Vec<_>>()
        .join("; ")
}
