use std::path::Path;

use super::WalkContext;
use crate::Result;
use crate::model::{DeploymentPerDevice, SyncDirId};

/// Callbacks fired by [`super::DirectoryNavigator`] in depth-first order.
///
/// Every method has a default, so a visitor implements only what it uses.
/// A `start_*` method returning `false` prunes that subtree; its matching
/// `end_*` is then not called.
#[allow(unused_variables)]
pub trait DirectoryVisitor {
    fn start_processing(&mut self, ctx: &WalkContext) -> Result<bool> {
        Ok(true)
    }

    fn end_processing(&mut self, ctx: &WalkContext) -> Result<()> {
        Ok(())
    }

    fn start_device_operational_data(&mut self, ctx: &WalkContext, device: &str) -> Result<bool> {
        Ok(true)
    }

    /// A ledger CSV written by the loader on `ctx.operational_device`.
    fn process_ledger_file(
        &mut self,
        ctx: &WalkContext,
        path: &Path,
        includes_headers: bool,
    ) -> Result<()> {
        Ok(())
    }

    fn process_tbloader_log_file(&mut self, ctx: &WalkContext, path: &Path) -> Result<()> {
        Ok(())
    }

    fn end_device_operational_data(&mut self, ctx: &WalkContext) -> Result<()> {
        Ok(())
    }

    fn start_device_deployment(
        &mut self,
        ctx: &WalkContext,
        deployment: &DeploymentPerDevice,
    ) -> Result<bool> {
        Ok(true)
    }

    fn end_device_deployment(&mut self, ctx: &WalkContext) -> Result<()> {
        Ok(())
    }

    fn start_village(&mut self, ctx: &WalkContext, village: &str) -> Result<bool> {
        Ok(true)
    }

    fn end_village(&mut self, ctx: &WalkContext) -> Result<()> {
        Ok(())
    }

    fn start_talking_book(&mut self, ctx: &WalkContext, talking_book: &str) -> Result<bool> {
        Ok(true)
    }

    fn end_talking_book(&mut self, ctx: &WalkContext) -> Result<()> {
        Ok(())
    }

    fn process_sync_dir(&mut self, ctx: &WalkContext, id: &SyncDirId, path: &Path) -> Result<()> {
        Ok(())
    }
}

macro_rules! forward {
    ($($method:ident($($arg:ident: $ty:ty),*) -> $ret:ty;)*) => {
        $(
            fn $method(&mut self, ctx: &WalkContext $(, $arg: $ty)*) -> $ret {
                (**self).$method(ctx $(, $arg)*)
            }
        )*
    };
}

impl<V: DirectoryVisitor + ?Sized> DirectoryVisitor for &mut V {
    forward! {
        start_processing() -> Result<bool>;
        end_processing() -> Result<()>;
        start_device_operational_data(device: &str) -> Result<bool>;
        process_ledger_file(path: &Path, includes_headers: bool) -> Result<()>;
        process_tbloader_log_file(path: &Path) -> Result<()>;
        end_device_operational_data() -> Result<()>;
        start_device_deployment(deployment: &DeploymentPerDevice) -> Result<bool>;
        end_device_deployment() -> Result<()>;
        start_village(village: &str) -> Result<bool>;
        end_village() -> Result<()>;
        start_talking_book(talking_book: &str) -> Result<bool>;
        end_talking_book() -> Result<()>;
        process_sync_dir(id: &SyncDirId, path: &Path) -> Result<()>;
    }
}
