//! Identifiers parsed from directory and file names.

mod deployment;
mod device;
mod format;
mod sync_dir;

pub use deployment::DeploymentId;
pub use device::DeploymentPerDevice;
pub use format::DirectoryFormat;
pub use sync_dir::{SyncDirId, SyncDirVersion, TimeKey};
