//! Error types for tb-formats

/// Result type for tb-formats operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort reading a whole input stream
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error reading {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(file: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            file: file.into(),
            source,
        }
    }
}

/// A single binary file that cannot be trusted.
///
/// Corruption is an expected outcome on field hardware, so decoders return
/// it as a value and callers report it per file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorruptFile {
    #[error(
        "{structure} needs {needed} bytes at offset {offset}, but only {available} remain"
    )]
    Truncated {
        structure: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("stats file version is {found}, expected {expected}")]
    VersionMismatch { found: i32, expected: i32 },

    #[error("stats counters add up to {total}, more than the plausible {limit}")]
    ImplausibleCounts { total: i64, limit: i64 },
}
