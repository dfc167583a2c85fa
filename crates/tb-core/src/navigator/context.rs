use std::path::{Path, PathBuf};

use crate::manifest::StatsPackageManifest;
use crate::model::{DeploymentId, DeploymentPerDevice, DirectoryFormat};

/// Where a walk currently is. Handed to every [`super::DirectoryVisitor`]
/// callback.
#[derive(Debug, Clone)]
pub struct WalkContext {
    pub root: PathBuf,
    pub format: DirectoryFormat,
    /// `None` only while a manifest is being generated.
    pub manifest: Option<StatsPackageManifest>,
    pub strict: bool,
    pub operational_device: Option<String>,
    pub deployment: Option<DeploymentPerDevice>,
    pub deployment_id: Option<DeploymentId>,
    pub village: Option<String>,
    pub talking_book: Option<String>,
}

impl WalkContext {
    pub fn new(
        root: impl Into<PathBuf>,
        format: DirectoryFormat,
        manifest: Option<StatsPackageManifest>,
        strict: bool,
    ) -> Self {
        Self {
            root: root.into(),
            format,
            manifest,
            strict,
            operational_device: None,
            deployment: None,
            deployment_id: None,
            village: None,
            talking_book: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Device of the current deployment, or the current operational device.
    pub fn device(&self) -> &str {
        self.deployment
            .as_ref()
            .map(|d| d.device.as_str())
            .or(self.operational_device.as_deref())
            .unwrap_or_default()
    }

    pub fn village(&self) -> &str {
        self.village.as_deref().unwrap_or_default()
    }

    pub fn talking_book(&self) -> &str {
        self.talking_book.as_deref().unwrap_or_default()
    }

    /// Directory of the current `(deployment, device)` pair.
    pub fn deployment_root(&self) -> Option<PathBuf> {
        self.deployment
            .as_ref()
            .map(|d| d.root(&self.root, self.format))
    }

    /// Format version matching policies key on. The manifest wins over the
    /// walk format.
    pub fn format_version(&self) -> u8 {
        self.manifest
            .as_ref()
            .map_or(self.format.version(), |m| m.format_version)
    }
}
