//! Deterministic depth-first walk over sync and archive trees.
//!
//! [`DirectoryNavigator::walk`] resolves the root's manifest, then visits
//! each device's operational data followed by every
//! `deployment / village / talking book / sync directory` below it.
//! Visitors see the same callback order whichever layout the root uses.
//!
//! [`walk_package`] is the entry point for a directory a package was
//! unpacked into: it finds the processing roots below it and walks each.

mod context;
mod filter;
pub mod layout;
mod manifest_builder;
mod visitor;

use std::path::{Path, PathBuf};

use tb_fs::dir;

pub use context::WalkContext;
pub use filter::FilteringVisitor;
pub use layout::detect_roots;
pub use manifest_builder::ManifestBuilder;
pub use visitor::DirectoryVisitor;

use crate::config::StatsConfig;
use crate::manifest::StatsPackageManifest;
use crate::model::{DeploymentId, DeploymentPerDevice, DirectoryFormat, SyncDirId, SyncDirVersion};
use crate::{Error, Result};

/// Walks one processing root.
#[derive(Debug, Clone)]
pub struct DirectoryNavigator {
    root: PathBuf,
    format: Option<DirectoryFormat>,
    strict: bool,
    persist_generated_manifest: bool,
}

impl DirectoryNavigator {
    /// `format` is only a hint when the root carries a manifest.
    pub fn new(root: impl Into<PathBuf>, format: Option<DirectoryFormat>, strict: bool) -> Self {
        Self {
            root: root.into(),
            format,
            strict,
            persist_generated_manifest: false,
        }
    }

    pub fn from_config(root: impl Into<PathBuf>, config: &StatsConfig) -> Self {
        Self::new(root, config.format, config.strict)
            .persist_generated_manifest(config.persist_generated_manifest)
    }

    /// Write a manifest generated for a root without one back to disk.
    pub fn persist_generated_manifest(mut self, persist: bool) -> Self {
        self.persist_generated_manifest = persist;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// The root's format and manifest, generating the manifest when the
    /// root has none.
    pub fn resolve_manifest(&self) -> Result<(DirectoryFormat, StatsPackageManifest)> {
        if let Some(manifest) = StatsPackageManifest::load(&self.root)? {
            let declared = manifest.format()?;
            match self.format {
                Some(requested) if requested != declared => {
                    if self.strict {
                        return Err(Error::FormatMismatch {
                            root: self.root.clone(),
                            manifest: declared,
                            requested,
                        });
                    }
                    tracing::error!(
                        root = %self.root.display(),
                        %declared,
                        %requested,
                        "Manifest format disagrees with the requested format; using the manifest"
                    );
                }
                _ => {}
            }
            return Ok((declared, manifest));
        }

        let format = match self.format {
            Some(format) => format,
            None if self.strict => {
                return Err(Error::MissingFormat {
                    root: self.root.clone(),
                });
            }
            None => {
                tracing::warn!(root = %self.root.display(), "No manifest and no format; assuming sync layout");
                DirectoryFormat::Sync
            }
        };

        let manifest = self.generate_manifest(format)?;
        if self.persist_generated_manifest {
            manifest.save(&self.root)?;
            tracing::info!(root = %self.root.display(), "Wrote generated manifest");
        }
        Ok((format, manifest))
    }

    /// Build a manifest from the sync directories present under the root.
    pub fn generate_manifest(&self, format: DirectoryFormat) -> Result<StatsPackageManifest> {
        let mut builder = ManifestBuilder::new();
        let ctx = WalkContext::new(&self.root, format, None, self.strict);
        self.walk_root(ctx, &mut builder)?;
        Ok(builder.into_manifest(format))
    }

    /// Visit the whole root.
    pub fn walk<V: DirectoryVisitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        if !self.root.exists() {
            if self.strict {
                return Err(Error::MissingRoot {
                    path: self.root.clone(),
                });
            }
            tracing::warn!(root = %self.root.display(), "Root directory does not exist; skipping");
            return Ok(());
        }

        let (format, manifest) = self.resolve_manifest()?;
        let ctx = WalkContext::new(&self.root, format, Some(manifest), self.strict);
        self.walk_root(ctx, visitor)
    }

    fn walk_root<V: DirectoryVisitor + ?Sized>(
        &self,
        mut ctx: WalkContext,
        visitor: &mut V,
    ) -> Result<()> {
        let deployments = layout::discover_deployments(&ctx.root, ctx.format)?;
        if deployments.is_empty() {
            if self.strict {
                return Err(Error::NoDeployments {
                    root: ctx.root.clone(),
                });
            }
            tracing::warn!(
                root = %ctx.root.display(),
                format = %ctx.format,
                "No deployments found; check the directory format"
            );
        }

        if !visitor.start_processing(&ctx)? {
            return Ok(());
        }

        for device in layout::operational_devices(&ctx.root, ctx.format, &deployments)? {
            ctx.operational_device = Some(device.clone());
            if !visitor.start_device_operational_data(&ctx, &device)? {
                continue;
            }
            for (path, includes_headers) in layout::ledger_files(&ctx.root, &device, ctx.format)? {
                visitor.process_ledger_file(&ctx, &path, includes_headers)?;
            }
            for path in layout::tbloader_log_files(&ctx.root, &device, ctx.format)? {
                visitor.process_tbloader_log_file(&ctx, &path)?;
            }
            visitor.end_device_operational_data(&ctx)?;
        }
        ctx.operational_device = None;

        for deployment in &deployments {
            self.walk_deployment(&mut ctx, deployment, visitor)?;
        }
        ctx.deployment = None;
        ctx.deployment_id = None;

        visitor.end_processing(&ctx)
    }

    fn walk_deployment<V: DirectoryVisitor + ?Sized>(
        &self,
        ctx: &mut WalkContext,
        deployment: &DeploymentPerDevice,
        visitor: &mut V,
    ) -> Result<()> {
        let deployment_id = DeploymentId::parse(&deployment.deployment);
        if !deployment_id.is_valid() {
            if self.strict {
                return Err(Error::InvalidDeployment {
                    deployment: deployment.deployment.clone(),
                });
            }
            tracing::warn!(deployment = %deployment.deployment, "Deployment name has no year");
        }

        ctx.deployment = Some(deployment.clone());
        ctx.deployment_id = Some(deployment_id.clone());
        if !visitor.start_device_deployment(ctx, deployment)? {
            return Ok(());
        }

        let deployment_root = deployment.root(&ctx.root, ctx.format);
        for village_dir in dir::list_visible_dirs(&deployment_root)? {
            let village = dir::file_name(&village_dir).trim().to_string();
            ctx.village = Some(village.clone());
            if visitor.start_village(ctx, &village)? {
                self.walk_village(ctx, &deployment_id, &village_dir, visitor)?;
                visitor.end_village(ctx)?;
            }
        }
        ctx.village = None;

        visitor.end_device_deployment(ctx)
    }

    fn walk_village<V: DirectoryVisitor + ?Sized>(
        &self,
        ctx: &mut WalkContext,
        deployment_id: &DeploymentId,
        village_dir: &Path,
        visitor: &mut V,
    ) -> Result<()> {
        for talking_book_dir in dir::list_visible_dirs(village_dir)? {
            let talking_book = dir::file_name(&talking_book_dir).trim().to_string();
            ctx.talking_book = Some(talking_book.clone());
            if visitor.start_talking_book(ctx, &talking_book)? {
                self.walk_talking_book(ctx, deployment_id, &talking_book_dir, visitor)?;
                visitor.end_talking_book(ctx)?;
            }
        }
        ctx.talking_book = None;
        Ok(())
    }

    fn walk_talking_book<V: DirectoryVisitor + ?Sized>(
        &self,
        ctx: &WalkContext,
        deployment_id: &DeploymentId,
        talking_book_dir: &Path,
        visitor: &mut V,
    ) -> Result<()> {
        let mut sync_dirs = Vec::new();
        for path in dir::list_dirs(talking_book_dir)? {
            let id = SyncDirId::parse(deployment_id, dir::file_name(&path).trim());
            if id.date_time.is_none() {
                tracing::debug!(path = %path.display(), "Skipping directory without a sync time");
                continue;
            }
            if ctx.format == DirectoryFormat::Archive && id.version == SyncDirVersion::V1 {
                if self.strict {
                    return Err(Error::LegacySyncDirInArchive { path });
                }
                tracing::warn!(path = %path.display(), "Legacy sync directory name in archive tree");
            }
            sync_dirs.push((id, path));
        }
        sync_dirs.sort_by(|a, b| a.0.cmp(&b.0));

        for (id, path) in &sync_dirs {
            visitor.process_sync_dir(ctx, id, path)?;
        }
        Ok(())
    }
}

/// The processing roots to walk for `dir`.
///
/// A directory with no recognizable root below it, or one that does not
/// exist, is its own root so that the walk reports it.
pub fn package_roots(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(vec![dir.to_path_buf()]);
    }
    let roots = detect_roots(dir)?;
    if roots.is_empty() {
        tracing::debug!(dir = %dir.display(), "No processing roots detected; walking as given");
        return Ok(vec![dir.to_path_buf()]);
    }
    if roots.as_slice() != [dir.to_path_buf()] {
        tracing::info!(dir = %dir.display(), roots = roots.len(), "Detected processing roots");
    }
    Ok(roots)
}

/// Walk every processing root below `dir` with one visitor.
///
/// Each root gets its own `start_processing` .. `end_processing` pass.
pub fn walk_package<V: DirectoryVisitor + ?Sized>(
    dir: &Path,
    config: &StatsConfig,
    visitor: &mut V,
) -> Result<()> {
    for root in package_roots(dir)? {
        DirectoryNavigator::from_config(root, config).walk(visitor)?;
    }
    Ok(())
}
