use std::path::Path;

use super::{DirectoryVisitor, WalkContext};
use crate::Result;
use crate::model::{DeploymentPerDevice, SyncDirId};

/// Restricts a walk to named devices, deployments, villages and talking
/// books. Names compare case-insensitively; `None` admits everything.
///
/// A pruned subtree never reaches the inner visitor.
#[derive(Debug, Default)]
pub struct FilteringVisitor<V> {
    inner: V,
    devices: Option<Vec<String>>,
    deployments: Option<Vec<String>>,
    villages: Option<Vec<String>>,
    talking_books: Option<Vec<String>>,
}

impl<V: DirectoryVisitor> FilteringVisitor<V> {
    pub fn new(inner: V) -> Self {
        Self {
            inner,
            devices: None,
            deployments: None,
            villages: None,
            talking_books: None,
        }
    }

    pub fn devices<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.devices = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn deployments<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.deployments = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn villages<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.villages = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn talking_books<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.talking_books = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn inner(&self) -> &V {
        &self.inner
    }

    pub fn into_inner(self) -> V {
        self.inner
    }
}

fn admits(allowed: &Option<Vec<String>>, name: &str) -> bool {
    allowed
        .as_ref()
        .is_none_or(|names| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
}

impl<V: DirectoryVisitor> DirectoryVisitor for FilteringVisitor<V> {
    fn start_processing(&mut self, ctx: &WalkContext) -> Result<bool> {
        self.inner.start_processing(ctx)
    }

    fn end_processing(&mut self, ctx: &WalkContext) -> Result<()> {
        self.inner.end_processing(ctx)
    }

    fn start_device_operational_data(&mut self, ctx: &WalkContext, device: &str) -> Result<bool> {
        if !admits(&self.devices, device) {
            return Ok(false);
        }
        self.inner.start_device_operational_data(ctx, device)
    }

    fn process_ledger_file(
        &mut self,
        ctx: &WalkContext,
        path: &Path,
        includes_headers: bool,
    ) -> Result<()> {
        self.inner.process_ledger_file(ctx, path, includes_headers)
    }

    fn process_tbloader_log_file(&mut self, ctx: &WalkContext, path: &Path) -> Result<()> {
        self.inner.process_tbloader_log_file(ctx, path)
    }

    fn end_device_operational_data(&mut self, ctx: &WalkContext) -> Result<()> {
        self.inner.end_device_operational_data(ctx)
    }

    fn start_device_deployment(
        &mut self,
        ctx: &WalkContext,
        deployment: &DeploymentPerDevice,
    ) -> Result<bool> {
        if !admits(&self.devices, &deployment.device)
            || !admits(&self.deployments, &deployment.deployment)
        {
            return Ok(false);
        }
        self.inner.start_device_deployment(ctx, deployment)
    }

    fn end_device_deployment(&mut self, ctx: &WalkContext) -> Result<()> {
        self.inner.end_device_deployment(ctx)
    }

    fn start_village(&mut self, ctx: &WalkContext, village: &str) -> Result<bool> {
        if !admits(&self.villages, village) {
            return Ok(false);
        }
        self.inner.start_village(ctx, village)
    }

    fn end_village(&mut self, ctx: &WalkContext) -> Result<()> {
        self.inner.end_village(ctx)
    }

    fn start_talking_book(&mut self, ctx: &WalkContext, talking_book: &str) -> Result<bool> {
        if !admits(&self.talking_books, talking_book) {
            return Ok(false);
        }
        self.inner.start_talking_book(ctx, talking_book)
    }

    fn end_talking_book(&mut self, ctx: &WalkContext) -> Result<()> {
        self.inner.end_talking_book(ctx)
    }

    fn process_sync_dir(&mut self, ctx: &WalkContext, id: &SyncDirId, path: &Path) -> Result<()> {
        self.inner.process_sync_dir(ctx, id, path)
    }
}
