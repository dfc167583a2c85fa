//! Error types for tb-core

use std::path::PathBuf;

use crate::model::DirectoryFormat;

/// Result type for tb-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Structural failures that stop a walk.
///
/// Reconciliation findings are not errors; they are collected as
/// [`crate::validation::ValidationError`] values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Root directory does not exist: {path}")]
    MissingRoot { path: PathBuf },

    #[error("No manifest at {root} and no directory format was given")]
    MissingFormat { root: PathBuf },

    #[error("Manifest at {root} declares format {manifest}, but {requested} was requested")]
    FormatMismatch {
        root: PathBuf,
        manifest: DirectoryFormat,
        requested: DirectoryFormat,
    },

    #[error("Unknown manifest format version: {version}")]
    UnknownFormatVersion { version: u8 },

    #[error("Cannot merge manifests with format versions {left} and {right}")]
    ManifestVersionMismatch { left: u8, right: u8 },

    #[error("No deployments found under {root}; check the directory format")]
    NoDeployments { root: PathBuf },

    #[error("Illegal deployment: {deployment}")]
    InvalidDeployment { deployment: String },

    #[error("Archive tree contains a sync directory with a legacy name: {path}")]
    LegacySyncDirInArchive { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem error from tb-fs
    #[error(transparent)]
    Fs(#[from] tb_fs::Error),

    /// Decoder error from tb-formats
    #[error(transparent)]
    Formats(#[from] tb_formats::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
