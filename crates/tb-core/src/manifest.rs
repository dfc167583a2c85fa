//! `StatsPackageManifest.json`, the per-root summary of which devices synced
//! and when.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tb_fs::{ConfigStore, NormalizedPath, TreePath};

use crate::model::DirectoryFormat;
use crate::{Error, Result};

/// Earliest and latest sync time seen for one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRange {
    #[serde(with = "epoch_millis")]
    pub start_time: NaiveDateTime,
    #[serde(with = "epoch_millis")]
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub incomplete: bool,
}

impl SyncRange {
    pub fn new(start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            end_time,
            incomplete: false,
        }
    }

    /// A range covering a single instant.
    pub fn at(time: NaiveDateTime) -> Self {
        Self::new(time, time)
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.start_time <= time && time <= self.end_time
    }

    /// Widen to include `time`.
    pub fn extend(&mut self, time: NaiveDateTime) {
        self.start_time = self.start_time.min(time);
        self.end_time = self.end_time.max(time);
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self {
            start_time: self.start_time.min(other.start_time),
            end_time: self.end_time.max(other.end_time),
            incomplete: self.incomplete || other.incomplete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPackageManifest {
    pub format_version: u8,
    #[serde(default)]
    pub devices: BTreeMap<String, SyncRange>,
}

impl StatsPackageManifest {
    pub fn new(format: DirectoryFormat) -> Self {
        Self {
            format_version: format.version(),
            devices: BTreeMap::new(),
        }
    }

    pub fn format(&self) -> Result<DirectoryFormat> {
        DirectoryFormat::from_version(self.format_version).ok_or(Error::UnknownFormatVersion {
            version: self.format_version,
        })
    }

    /// Range recorded for `device`, matching the name case-insensitively
    /// when there is no exact entry.
    pub fn range(&self, device: &str) -> Option<&SyncRange> {
        self.devices.get(device).or_else(|| {
            self.devices
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(device))
                .map(|(_, range)| range)
        })
    }

    /// Union of two manifests of the same format. Devices present in both
    /// get the merged range.
    pub fn merge(left: &Self, right: &Self) -> Result<Self> {
        if left.format_version != right.format_version {
            return Err(Error::ManifestVersionMismatch {
                left: left.format_version,
                right: right.format_version,
            });
        }

        let mut devices = left.devices.clone();
        for (device, range) in &right.devices {
            devices
                .entry(device.clone())
                .and_modify(|existing| *existing = existing.merge(range))
                .or_insert_with(|| range.clone());
        }

        Ok(Self {
            format_version: left.format_version,
            devices,
        })
    }

    pub fn path(root: &Path) -> PathBuf {
        root.join(TreePath::Manifest.as_str())
    }

    /// Read the manifest at `root`, if there is one.
    pub fn load(root: &Path) -> Result<Option<Self>> {
        let path = Self::path(root);
        if !path.is_file() {
            return Ok(None);
        }
        let manifest = ConfigStore::new().load(&NormalizedPath::new(&path))?;
        Ok(Some(manifest))
    }

    /// Write the manifest at `root` atomically.
    pub fn save(&self, root: &Path) -> Result<()> {
        ConfigStore::new().save(&NormalizedPath::new(Self::path(root)), self)?;
        Ok(())
    }
}

/// Times are stored as JSON numbers of epoch milliseconds.
mod epoch_millis {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(time.and_utc().timestamp_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let millis = i64::deserialize(deserializer)?;
        DateTime::from_timestamp_millis(millis)
            .map(|time| time.naive_utc())
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {millis}")))
    }
}
