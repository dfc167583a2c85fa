//! Error types for tb-cli

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] tb_core::Error),

    #[error(transparent)]
    Fs(#[from] tb_fs::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("cannot write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: tb_formats::CorruptFile,
    },

    /// Validation ran but left findings; they have already been printed.
    #[error("{count} finding(s) outstanding")]
    Findings { count: usize },

    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
