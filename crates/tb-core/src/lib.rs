//! Traversal and reconciliation of talking-book statistics trees
//!
//! Sync trees are written per device by the field loaders; archive trees
//! regroup the same sync directories per deployment. This crate walks
//! either layout in one deterministic order ([`navigator`]), decodes each
//! sync directory's payloads ([`processor`]), and checks every directory
//! against the loader ledgers ([`validation`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tb_core::{StatsConfig, validation};
//!
//! let config = StatsConfig::default();
//! for finding in validation::validate(Path::new("/data/collected"), &config)? {
//!     println!("{}: {finding}", finding.name());
//! }
//! # Ok::<(), tb_core::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod manifest;
pub mod merge;
pub mod model;
pub mod navigator;
pub mod processor;
pub mod validation;

pub use config::StatsConfig;
pub use error::{Error, Result};
pub use ledger::OperationalInfo;
pub use manifest::{StatsPackageManifest, SyncRange};
pub use merge::{ArchiveMerger, MergeSummary};
pub use model::{DeploymentId, DeploymentPerDevice, DirectoryFormat, SyncDirId, SyncDirVersion};
pub use navigator::{
    DirectoryNavigator, DirectoryVisitor, FilteringVisitor, ManifestBuilder, WalkContext,
    walk_package,
};
pub use processor::{EventTally, SyncDirProcessor};
pub use validation::{DirectoryCorruptionFixer, ValidatingVisitor, ValidationError};
