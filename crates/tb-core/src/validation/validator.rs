use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::TimeDelta;
use tb_fs::{TreePath, dir};

use super::{AllowedNames, PropertyDiff, UnmatchedEntry, ValidationError};
use crate::Result;
use crate::config::StatsConfig;
use crate::ledger::{self, OperationalInfo};
use crate::model::{DeploymentPerDevice, SyncDirId, SyncDirVersion, TimeKey};
use crate::navigator::{DirectoryVisitor, WalkContext};

const UNKNOWN: &str = "UNKNOWN";

#[derive(Debug, Clone)]
struct LedgerSlot {
    id: SyncDirId,
    info: OperationalInfo,
}

/// Cross-checks every sync directory against the loader ledgers.
///
/// Ledger rows are collected during the operational-data pass; each sync
/// directory visited afterwards is matched to a row and compared with it.
/// Rows left over at the end are reported together.
#[derive(Debug)]
pub struct ValidatingVisitor {
    errors: Vec<ValidationError>,
    ledger: BTreeMap<TimeKey, LedgerSlot>,
    matched: HashSet<TimeKey>,
    reported_devices: HashSet<String>,
    match_window: TimeDelta,
    allowed: Option<AllowedNames>,
}

impl Default for ValidatingVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatingVisitor {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            ledger: BTreeMap::new(),
            matched: HashSet::new(),
            reported_devices: HashSet::new(),
            match_window: TimeDelta::minutes(10),
            allowed: None,
        }
    }

    pub fn from_config(config: &StatsConfig) -> Self {
        let visitor = Self::new().with_match_window(config.match_window());
        match &config.allowed {
            Some(allowed) => visitor.with_allowed_names(allowed.clone()),
            None => visitor,
        }
    }

    /// How long after a legacy sync directory's time its ledger row may be.
    pub fn with_match_window(mut self, window: TimeDelta) -> Self {
        self.match_window = window;
        self
    }

    /// Also report deployments, villages and talking books not in `allowed`.
    pub fn with_allowed_names(mut self, allowed: AllowedNames) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Legacy trees: the first row for this device at or after the
    /// directory's time, if it was written within the window.
    fn find_following(&self, key: &TimeKey, device: &str) -> Option<TimeKey> {
        let (found, slot) = self
            .ledger
            .range(key..)
            .find(|(_, slot)| slot.info.device.eq_ignore_ascii_case(device))?;
        (slot.info.date_time <= key.date_time + self.match_window).then(|| found.clone())
    }

    fn record_match(&mut self, key: TimeKey) {
        if self.matched.contains(&key) {
            if let Some(slot) = self.ledger.get(&key) {
                self.errors.push(ValidationError::MultipleTbDataMatches {
                    dir_name: slot.info.sync_dir_name.clone(),
                    device: slot.info.device.clone(),
                });
            }
            return;
        }
        self.matched.insert(key);
    }

    fn compare_location(&mut self, ctx: &WalkContext, id: &SyncDirId, path: &Path, key: &TimeKey) {
        let (Some(slot), Some(deployment)) = (self.ledger.get(key), ctx.deployment.as_ref()) else {
            return;
        };
        let info = &slot.info;
        let mut diffs = Vec::new();

        if !ctx.village().eq_ignore_ascii_case(&info.in_village)
            && !info.in_village.eq_ignore_ascii_case(UNKNOWN)
        {
            diffs.push(PropertyDiff::new("Village", &info.in_village, ctx.village()));
        }
        if !ctx.talking_book().eq_ignore_ascii_case(&info.in_talking_book) {
            diffs.push(PropertyDiff::new(
                "Talking Book",
                &info.in_talking_book,
                ctx.talking_book(),
            ));
        }
        if !deployment.deployment.eq_ignore_ascii_case(&info.in_deployment) {
            diffs.push(PropertyDiff::new(
                "Deployment Id",
                &info.in_deployment,
                &deployment.deployment,
            ));
        }
        if !deployment.device.eq_ignore_ascii_case(&info.device) {
            diffs.push(PropertyDiff::new("Device", &info.device, &deployment.device));
        }

        if diffs.is_empty() {
            return;
        }
        let expected = deployment
            .root(ctx.root(), ctx.format)
            .join(&info.in_village)
            .join(&info.in_talking_book)
            .join(&id.dir_name);
        self.errors.push(ValidationError::InvalidSyncDirPath {
            path: path.to_path_buf(),
            expected,
            diffs,
        });
    }

    /// Each device's manifest problem is reported once.
    fn check_manifest_range(
        &mut self,
        ctx: &WalkContext,
        deployment: &DeploymentPerDevice,
        id: &SyncDirId,
        path: &Path,
    ) {
        let (Some(manifest), Some(sync_time)) = (ctx.manifest.as_ref(), id.date_time) else {
            return;
        };
        let device_key = deployment.device.to_lowercase();
        if self.reported_devices.contains(&device_key) {
            return;
        }

        let finding = match manifest.range(&deployment.device) {
            None => ValidationError::ManifestMissingDevice {
                device: deployment.device.clone(),
            },
            Some(range) if !range.contains(sync_time) => ValidationError::DeviceDateOutOfRange {
                device: deployment.device.clone(),
                start: range.start_time,
                end: range.end_time,
                sync_time,
                path: path.to_path_buf(),
            },
            Some(_) => return,
        };
        self.errors.push(finding);
        self.reported_devices.insert(device_key);
    }
}

impl DirectoryVisitor for ValidatingVisitor {
    fn end_processing(&mut self, _ctx: &WalkContext) -> Result<()> {
        let unmatched: Vec<UnmatchedEntry> = self
            .ledger
            .iter()
            .filter(|(key, _)| !self.matched.contains(*key))
            .map(|(_, slot)| UnmatchedEntry {
                id: slot.id.clone(),
                info: slot.info.clone(),
            })
            .collect();
        if !unmatched.is_empty() {
            self.errors
                .push(ValidationError::UnmatchedTbDataEntries { entries: unmatched });
        }

        self.ledger.clear();
        self.matched.clear();
        self.reported_devices.clear();
        Ok(())
    }

    fn process_ledger_file(
        &mut self,
        ctx: &WalkContext,
        path: &Path,
        includes_headers: bool,
    ) -> Result<()> {
        let device = ctx.operational_device.as_deref().unwrap_or_default();
        let file = ledger::read_ledger(path, device, ctx.format, includes_headers)?;

        for entry in file.entries.into_iter().filter(|e| e.is_update()) {
            let mut id = entry.id;
            let Some(mut key) = id.time_key() else {
                continue;
            };
            while self.ledger.contains_key(&key) {
                id = id.add_milli();
                let Some(next) = id.time_key() else { break };
                key = next;
            }
            self.ledger.insert(
                key,
                LedgerSlot {
                    id,
                    info: entry.info,
                },
            );
        }

        if !file.invalid.is_empty() {
            self.errors.push(ValidationError::InvalidTbDataProperties {
                file: path.to_path_buf(),
                properties: file.invalid,
            });
        }
        Ok(())
    }

    fn start_device_deployment(
        &mut self,
        _ctx: &WalkContext,
        deployment: &DeploymentPerDevice,
    ) -> Result<bool> {
        if let Some(allowed) = &self.allowed
            && !allowed.allows_deployment(&deployment.deployment)
        {
            self.errors.push(ValidationError::InvalidDeploymentId {
                deployment: deployment.deployment.clone(),
            });
        }
        Ok(true)
    }

    fn start_village(&mut self, _ctx: &WalkContext, village: &str) -> Result<bool> {
        if let Some(allowed) = &self.allowed
            && !allowed.allows_village(village)
        {
            self.errors.push(ValidationError::InvalidVillageName {
                village: village.to_string(),
            });
        }
        Ok(true)
    }

    fn start_talking_book(&mut self, _ctx: &WalkContext, talking_book: &str) -> Result<bool> {
        if let Some(allowed) = &self.allowed
            && !allowed.allows_talking_book(talking_book)
        {
            self.errors.push(ValidationError::InvalidTalkingBookName {
                talking_book: talking_book.to_string(),
            });
        }
        Ok(true)
    }

    fn process_sync_dir(&mut self, ctx: &WalkContext, id: &SyncDirId, path: &Path) -> Result<()> {
        let (Some(key), Some(deployment)) = (id.time_key(), ctx.deployment.clone()) else {
            return Ok(());
        };
        let format_version = ctx.format_version();

        let found = if format_version == 1 {
            self.find_following(&key, &deployment.device)
        } else {
            if id.version != SyncDirVersion::V2 {
                self.errors.push(ValidationError::InvalidSyncDirFormat {
                    dir_name: id.dir_name.clone(),
                    path: path.to_path_buf(),
                });
            }
            self.ledger.contains_key(&key).then(|| key.clone())
        };

        if path.join(TreePath::ChkdskMarker.as_str()).exists() {
            if let Some(found) = found {
                self.record_match(found);
            }
            return Ok(());
        }

        if dir::is_empty_dir(path)? {
            self.errors.push(ValidationError::EmptySyncDirectory {
                path: path.to_path_buf(),
            });
            return Ok(());
        }

        match found {
            None => self.errors.push(ValidationError::NoMatchingTbDataEntry {
                dir_name: id.dir_name.clone(),
                path: path.to_path_buf(),
                format_version,
            }),
            Some(found) => {
                self.record_match(found.clone());
                self.compare_location(ctx, id, path, &found);
            }
        }

        self.check_manifest_range(ctx, &deployment, id, path);
        Ok(())
    }
}
