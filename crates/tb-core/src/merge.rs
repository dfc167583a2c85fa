//! Folding a sync or archive tree into an archive tree.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tb_fs::dir;

use crate::config::StatsConfig;
use crate::manifest::StatsPackageManifest;
use crate::model::{DeploymentPerDevice, DirectoryFormat};
use crate::navigator::{self, DirectoryVisitor, WalkContext, layout};
use crate::{Error, Result};

/// What one merge copied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub deployments: usize,
    pub files: u64,
    pub ledgers: usize,
    pub tbloader_logs: usize,
}

/// Visitor that copies the walked tree into the archive tree at `dest`.
///
/// The destination manifest becomes the union of both manifests. Ledgers
/// are appended to the destination's file of the same name, so merging a
/// later export of the same device extends its history.
#[derive(Debug)]
pub struct ArchiveMerger {
    dest: PathBuf,
    operational_device: Option<String>,
    summary: MergeSummary,
}

impl ArchiveMerger {
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self {
            dest: dest.into(),
            operational_device: None,
            summary: MergeSummary::default(),
        }
    }

    pub fn summary(&self) -> &MergeSummary {
        &self.summary
    }

    pub fn into_summary(self) -> MergeSummary {
        self.summary
    }

    fn device(&self) -> &str {
        self.operational_device.as_deref().unwrap_or_default()
    }
}

impl DirectoryVisitor for ArchiveMerger {
    fn start_processing(&mut self, ctx: &WalkContext) -> Result<bool> {
        let mut source = ctx
            .manifest
            .clone()
            .unwrap_or_else(|| StatsPackageManifest::new(ctx.format));
        source.format_version = DirectoryFormat::Archive.version();

        let merged = match StatsPackageManifest::load(&self.dest)? {
            Some(existing) => StatsPackageManifest::merge(&existing, &source)?,
            None => source,
        };

        fs::create_dir_all(&self.dest).map_err(|e| Error::io(&self.dest, e))?;
        merged.save(&self.dest)?;
        tracing::info!(
            dest = %self.dest.display(),
            devices = merged.devices.len(),
            "Wrote merged manifest"
        );
        Ok(true)
    }

    fn start_device_operational_data(&mut self, _ctx: &WalkContext, device: &str) -> Result<bool> {
        self.operational_device = Some(device.to_string());
        Ok(true)
    }

    fn process_ledger_file(
        &mut self,
        _ctx: &WalkContext,
        path: &Path,
        _includes_headers: bool,
    ) -> Result<()> {
        let target = layout::canonical_ledger_dir(&self.dest, self.device(), DirectoryFormat::Archive)
            .join(dir::file_name(path));
        let bytes = tb_fs::io::read_bytes(path)?;
        tb_fs::io::append_bytes(&target, &bytes)?;
        tracing::debug!(from = %path.display(), to = %target.display(), "Appended ledger");
        self.summary.ledgers += 1;
        Ok(())
    }

    fn process_tbloader_log_file(&mut self, _ctx: &WalkContext, path: &Path) -> Result<()> {
        let target_dir = layout::tbloader_log_dir(&self.dest, self.device(), DirectoryFormat::Archive);
        fs::create_dir_all(&target_dir).map_err(|e| Error::io(&target_dir, e))?;
        let target = target_dir.join(dir::file_name(path));
        fs::copy(path, &target).map_err(|e| Error::io(path, e))?;
        self.summary.tbloader_logs += 1;
        Ok(())
    }

    fn end_device_operational_data(&mut self, _ctx: &WalkContext) -> Result<()> {
        self.operational_device = None;
        Ok(())
    }

    fn start_device_deployment(
        &mut self,
        ctx: &WalkContext,
        deployment: &DeploymentPerDevice,
    ) -> Result<bool> {
        let from = deployment.root(ctx.root(), ctx.format);
        let to = deployment.canonical_root(&self.dest, DirectoryFormat::Archive);
        let copied = dir::copy_dir_all(&from, &to)?;
        tracing::info!(
            deployment = %deployment.deployment,
            device = %deployment.device,
            files = copied,
            "Copied deployment"
        );
        self.summary.deployments += 1;
        self.summary.files += copied;
        Ok(false)
    }
}

/// Merge every processing root below `src` into the archive tree at `dest`.
pub fn merge_into(src: &Path, dest: &Path, config: &StatsConfig) -> Result<MergeSummary> {
    let mut merger = ArchiveMerger::new(dest);
    navigator::walk_package(src, config, &mut merger)?;
    Ok(merger.into_summary())
}
