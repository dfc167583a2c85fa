use std::collections::BTreeMap;
use std::path::Path;

use super::{DirectoryVisitor, WalkContext};
use crate::Result;
use crate::manifest::{StatsPackageManifest, SyncRange};
use crate::model::{DirectoryFormat, SyncDirId};

/// Records each device's earliest and latest sync time, for roots that
/// arrive without a manifest.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    devices: BTreeMap<String, SyncRange>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_manifest(self, format: DirectoryFormat) -> StatsPackageManifest {
        StatsPackageManifest {
            format_version: format.version(),
            devices: self.devices,
        }
    }
}

impl DirectoryVisitor for ManifestBuilder {
    fn start_device_operational_data(&mut self, _ctx: &WalkContext, _device: &str) -> Result<bool> {
        Ok(false)
    }

    fn process_sync_dir(&mut self, ctx: &WalkContext, id: &SyncDirId, _path: &Path) -> Result<()> {
        let Some(time) = id.date_time else {
            return Ok(());
        };
        self.devices
            .entry(ctx.device().to_string())
            .and_modify(|range| range.extend(time))
            .or_insert_with(|| SyncRange::at(time));
        Ok(())
    }
}
